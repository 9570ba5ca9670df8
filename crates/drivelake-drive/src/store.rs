//! Storage abstraction trait
//!
//! The seam between the upload orchestrator and the remote service. The real
//! implementation is `DriveClient`; tests drive the orchestrator against an
//! in-memory fake.

use std::path::Path;

use async_trait::async_trait;

use crate::error::DriveResult;
use crate::models::FileMetadata;
use crate::DriveClient;

/// Remote operations the upload orchestrator needs.
#[async_trait]
pub trait DriveStore: Send + Sync {
    /// Find a folder with the exact name under the parent, creating it when
    /// absent; return its id.
    async fn ensure_folder(&self, name: &str, parent_id: Option<&str>) -> DriveResult<String>;

    /// Id of any non-trashed file in the folder carrying the digest as its
    /// sha256 property.
    async fn find_by_checksum(&self, folder_id: &str, digest: &str)
        -> DriveResult<Option<String>>;

    /// Id of any non-trashed file with the exact name in the folder.
    async fn find_by_name(&self, folder_id: &str, filename: &str) -> DriveResult<Option<String>>;

    /// Create a new file from local content; returns the new file id.
    async fn upload_file(&self, metadata: &FileMetadata, path: &Path) -> DriveResult<String>;

    /// Replace an existing file's content and metadata in place.
    async fn update_file(
        &self,
        file_id: &str,
        metadata: &FileMetadata,
        path: &Path,
    ) -> DriveResult<String>;
}

#[async_trait]
impl DriveStore for DriveClient {
    async fn ensure_folder(&self, name: &str, parent_id: Option<&str>) -> DriveResult<String> {
        DriveClient::ensure_folder(self, name, parent_id).await
    }

    async fn find_by_checksum(
        &self,
        folder_id: &str,
        digest: &str,
    ) -> DriveResult<Option<String>> {
        DriveClient::find_by_checksum(self, folder_id, digest).await
    }

    async fn find_by_name(&self, folder_id: &str, filename: &str) -> DriveResult<Option<String>> {
        DriveClient::find_by_name(self, folder_id, filename).await
    }

    async fn upload_file(&self, metadata: &FileMetadata, path: &Path) -> DriveResult<String> {
        DriveClient::upload_file(self, metadata, path).await
    }

    async fn update_file(
        &self,
        file_id: &str,
        metadata: &FileMetadata,
        path: &Path,
    ) -> DriveResult<String> {
        DriveClient::update_file(self, file_id, metadata, path).await
    }
}
