//! File and folder operations against the Drive v3 API.

use std::path::Path;
use std::time::Instant;

use reqwest::header::{CONTENT_LENGTH, CONTENT_RANGE, LOCATION};
use reqwest::Method;
use tokio::io::AsyncReadExt;

use crate::error::{DriveError, DriveResult};
use crate::models::{DriveFile, FileList, FileMetadata, FOLDER_MIME_TYPE, SHA256_PROPERTY};
use crate::query::Query;
use crate::DriveClient;

/// Matches the upstream page size; lookups only need "at least one match".
const LIST_PAGE_SIZE: u32 = 10;

impl DriveClient {
    /// List non-trashed objects matching the query. First page only.
    pub async fn list_files(&self, query: &Query) -> DriveResult<Vec<DriveFile>> {
        let url = format!("{}/files", self.api_base);
        let request = self
            .http
            .get(&url)
            .query(&[
                ("q", query.build()),
                ("fields", "files(id, name)".to_string()),
                ("pageSize", LIST_PAGE_SIZE.to_string()),
            ])
            .query(&self.list_scope_params());
        let request = self.authorized(request).await?;

        let list: FileList = Self::check_json(request.send().await?).await?;
        Ok(list.files)
    }

    /// Find a folder with the exact name under the given parent, creating it
    /// when absent. Returns the folder id.
    ///
    /// Lookup-then-create is not atomic; a concurrent writer can still
    /// produce duplicate same-named folders.
    pub async fn ensure_folder(
        &self,
        name: &str,
        parent_id: Option<&str>,
    ) -> DriveResult<String> {
        let mut query = Query::new()
            .name_eq(name)
            .mime_eq(FOLDER_MIME_TYPE)
            .not_trashed();
        if let Some(parent) = parent_id {
            query = query.parent(parent);
        }

        let matches = self.list_files(&query).await?;
        if let Some(first) = matches.first() {
            if matches.len() > 1 {
                tracing::warn!(
                    folder = %name,
                    count = matches.len(),
                    "Multiple same-named folders found; using the first match"
                );
            }
            tracing::debug!(folder = %name, id = %first.id, "Found existing folder");
            return Ok(first.id.clone());
        }

        let metadata = FileMetadata::folder(name, parent_id);
        let url = format!("{}/files", self.api_base);
        let request = self
            .http
            .post(&url)
            .query(&[("supportsAllDrives", "true"), ("fields", "id")])
            .json(&metadata);
        let request = self.authorized(request).await?;

        let created: DriveFile = Self::check_json(request.send().await?).await?;
        tracing::info!(folder = %name, id = %created.id, "Created folder");
        Ok(created.id)
    }

    /// Id of any non-trashed file in the folder whose sha256 property equals
    /// the digest.
    pub async fn find_by_checksum(
        &self,
        folder_id: &str,
        digest: &str,
    ) -> DriveResult<Option<String>> {
        let query = Query::new()
            .parent(folder_id)
            .app_property(SHA256_PROPERTY, digest)
            .not_trashed();
        Ok(self.list_files(&query).await?.first().map(|f| f.id.clone()))
    }

    /// Id of any non-trashed file with the exact name in the folder.
    pub async fn find_by_name(
        &self,
        folder_id: &str,
        filename: &str,
    ) -> DriveResult<Option<String>> {
        let query = Query::new()
            .name_eq(filename)
            .parent(folder_id)
            .not_trashed();
        Ok(self.list_files(&query).await?.first().map(|f| f.id.clone()))
    }

    /// Create a new file with the given metadata and local content via a
    /// resumable chunked upload. Returns the new file id.
    pub async fn upload_file(&self, metadata: &FileMetadata, path: &Path) -> DriveResult<String> {
        let url = format!(
            "{}/files?uploadType=resumable&supportsAllDrives=true",
            self.upload_base
        );
        self.resumable_upload(Method::POST, &url, metadata, path)
            .await
    }

    /// Replace an existing file's content and metadata in place. `parents`
    /// is dropped from the metadata since it is not writable on update.
    pub async fn update_file(
        &self,
        file_id: &str,
        metadata: &FileMetadata,
        path: &Path,
    ) -> DriveResult<String> {
        let url = format!(
            "{}/files/{}?uploadType=resumable&supportsAllDrives=true",
            self.upload_base,
            file_id
        );
        self.resumable_upload(Method::PATCH, &url, &metadata.for_update(), path)
            .await
    }

    async fn resumable_upload(
        &self,
        method: Method,
        url: &str,
        metadata: &FileMetadata,
        path: &Path,
    ) -> DriveResult<String> {
        let total = std::fs::metadata(path)
            .map_err(|e| DriveError::io(path.display().to_string(), e))?
            .len();
        let start = Instant::now();

        // Open the session: metadata in the body, content described by the
        // X-Upload-Content-* headers.
        let mut request = self
            .http
            .request(method, url)
            .header("X-Upload-Content-Length", total.to_string())
            .json(metadata);
        if let Some(mime) = &metadata.mime_type {
            request = request.header("X-Upload-Content-Type", mime);
        }
        let request = self.authorized(request).await?;
        let response = Self::check(request.send().await?).await?;

        let session_uri = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                DriveError::Protocol("resumable session response carried no Location header".into())
            })?
            .to_string();

        let file = self.put_chunks(&session_uri, path, total).await?;

        tracing::info!(
            name = %metadata.name,
            id = %file.id,
            size_bytes = total,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload complete"
        );
        Ok(file.id)
    }

    /// PUT the file content to the session URI in `chunk_size` blocks. The
    /// session URI is itself authorized; chunk requests carry no token.
    async fn put_chunks(
        &self,
        session_uri: &str,
        path: &Path,
        total: u64,
    ) -> DriveResult<DriveFile> {
        if total == 0 {
            let response = self
                .http
                .put(session_uri)
                .header(CONTENT_LENGTH, "0")
                .header(CONTENT_RANGE, "bytes */0")
                .send()
                .await?;
            return Self::check_json(response).await;
        }

        let mut file = tokio::fs::File::open(path)
            .await
            .map_err(|e| DriveError::io(path.display().to_string(), e))?;
        let mut offset: u64 = 0;

        loop {
            let want = self.chunk_size.min((total - offset) as usize);
            let mut chunk = vec![0u8; want];
            let mut filled = 0;
            while filled < want {
                let n = file
                    .read(&mut chunk[filled..])
                    .await
                    .map_err(|e| DriveError::io(path.display().to_string(), e))?;
                if n == 0 {
                    break;
                }
                filled += n;
            }
            if filled == 0 {
                return Err(DriveError::Protocol(format!(
                    "{} shrank during upload ({} of {} bytes sent)",
                    path.display(),
                    offset,
                    total
                )));
            }
            chunk.truncate(filled);

            let end = offset + filled as u64 - 1;
            let response = self
                .http
                .put(session_uri)
                .header(CONTENT_RANGE, format!("bytes {}-{}/{}", offset, end, total))
                .body(chunk)
                .send()
                .await?;

            // 308: chunk accepted, session still open
            if response.status().as_u16() == 308 {
                offset = end + 1;
                tracing::debug!(offset, total, "Uploaded chunk");
                continue;
            }
            return Self::check_json(response).await;
        }
    }
}
