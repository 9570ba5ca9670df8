//! Google Drive v3 client for drivelake.
//!
//! Thin client over the Drive REST surface: structured list queries, folder
//! lookup-or-create, duplicate detection by content-digest property, and
//! resumable chunked uploads/updates. Auth is a pre-provisioned token cache
//! with automatic refresh; see the `auth` module.

pub mod auth;
pub mod error;
pub mod files;
pub mod models;
pub mod query;
pub mod store;

use std::time::Duration;

use reqwest::Client;

// Re-export commonly used types
pub use crate::auth::{Authenticator, Credentials, StoredToken};
pub use crate::error::{DriveError, DriveResult};
pub use crate::models::{DriveFile, FileList, FileMetadata, FOLDER_MIME_TYPE, SHA256_PROPERTY};
pub use crate::query::Query;
pub use crate::store::DriveStore;

const API_BASE_URL: &str = "https://www.googleapis.com/drive/v3";
const UPLOAD_BASE_URL: &str = "https://www.googleapis.com/upload/drive/v3";

/// Storage scope every call is issued against: the caller's own storage or
/// a shared drive.
#[derive(Debug, Clone)]
pub enum DriveScope {
    User,
    SharedDrive(String),
}

/// HTTP client for the Drive v3 API.
pub struct DriveClient {
    http: Client,
    auth: Authenticator,
    scope: DriveScope,
    chunk_size: usize,
    api_base: String,
    upload_base: String,
}

impl DriveClient {
    /// Build a client. `chunk_size` is the resumable upload block size in
    /// bytes and must be a positive multiple of 256 KiB per the Drive
    /// protocol; the configured MiB sizes always are.
    pub fn new(auth: Authenticator, scope: DriveScope, chunk_size: usize) -> DriveResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(DriveClient {
            http,
            auth,
            scope,
            chunk_size,
            api_base: API_BASE_URL.to_string(),
            upload_base: UPLOAD_BASE_URL.to_string(),
        })
    }

    pub fn scope(&self) -> &DriveScope {
        &self.scope
    }

    /// Attach a bearer token, refreshing it first when needed.
    pub(crate) async fn authorized(
        &self,
        request: reqwest::RequestBuilder,
    ) -> DriveResult<reqwest::RequestBuilder> {
        let token = self.auth.access_token().await?;
        Ok(request.bearer_auth(token))
    }

    /// Scoping parameters sent with every list call.
    pub(crate) fn list_scope_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("supportsAllDrives", "true".to_string()),
            ("includeItemsFromAllDrives", "true".to_string()),
        ];
        match &self.scope {
            DriveScope::User => params.push(("corpora", "user".to_string())),
            DriveScope::SharedDrive(id) => {
                params.push(("corpora", "drive".to_string()));
                params.push(("driveId", id.clone()));
            }
        }
        params
    }

    /// Map a non-success response to an API error carrying the body text.
    pub(crate) async fn check(response: reqwest::Response) -> DriveResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        Err(DriveError::Api {
            status: status.as_u16(),
            message,
        })
    }

    pub(crate) async fn check_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> DriveResult<T> {
        Ok(Self::check(response).await?.json().await?)
    }
}
