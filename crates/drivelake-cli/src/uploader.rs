//! Upload orchestration.
//!
//! Drives one run end to end: discover local files, resolve the fixed
//! `root/year/month/project/type` folder chain once, then process each file
//! through categorize → hash → dedupe → create-or-update. Only the final
//! create/update call is caught per file; failures in folder resolution or
//! the lookup queries abort the run.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use drivelake_core::{
    checksum, scanner, Config, ExtensionFilter, MediaCategory, RunReport, UploadOutcome,
};
use drivelake_drive::{DriveResult, DriveStore, FileMetadata};

/// Resolve the fixed folder chain for the run and return the type-level
/// folder id that category folders hang off.
pub async fn resolve_chain<S: DriveStore + ?Sized>(
    store: &S,
    config: &Config,
) -> DriveResult<String> {
    let (year, month) = config.target_year_month();

    let root = store.ensure_folder(&config.root_folder, None).await?;
    let year_id = store
        .ensure_folder(&format!("{:04}", year), Some(&root))
        .await?;
    let month_id = store
        .ensure_folder(&format!("{:02}", month), Some(&year_id))
        .await?;
    let project_id = store
        .ensure_folder(&config.project, Some(&month_id))
        .await?;
    store.ensure_folder(&config.type_tag, Some(&project_id)).await
}

/// Per-run upload driver. Holds no per-file state; the only memo is the
/// category-folder map so each category is resolved once.
pub struct Uploader<'a, S: DriveStore + ?Sized> {
    store: &'a S,
    config: &'a Config,
    type_folder_id: String,
    category_folders: HashMap<MediaCategory, String>,
}

impl<'a, S: DriveStore + ?Sized> Uploader<'a, S> {
    pub fn new(store: &'a S, config: &'a Config, type_folder_id: String) -> Self {
        Uploader {
            store,
            config,
            type_folder_id,
            category_folders: HashMap::new(),
        }
    }

    /// Process every file in order, collecting per-file outcomes.
    pub async fn run(&mut self, files: &[PathBuf]) -> DriveResult<RunReport> {
        let mut report = RunReport::new();
        for path in files {
            let outcome = self.process_file(path).await?;
            report.record(path.clone(), outcome);
        }
        Ok(report)
    }

    async fn process_file(&mut self, path: &Path) -> DriveResult<UploadOutcome> {
        let filename = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => {
                return Ok(UploadOutcome::Failed {
                    reason: format!("{} has no file name", path.display()),
                })
            }
        };
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        let category = MediaCategory::from_extension(&ext);
        let folder_id = self.category_folder(category).await?;

        let digest = if self.config.checksum {
            match checksum::sha256_file(path) {
                Ok(digest) => Some(digest),
                Err(e) => {
                    tracing::error!(file = %path.display(), error = %e, "Failed to hash file");
                    return Ok(UploadOutcome::Failed {
                        reason: e.to_string(),
                    });
                }
            }
        } else {
            None
        };

        if self.config.dedupe_enabled() {
            if let Some(digest) = &digest {
                if self
                    .store
                    .find_by_checksum(&folder_id, digest)
                    .await?
                    .is_some()
                {
                    tracing::info!(file = %filename, "Skipping duplicate checksum");
                    return Ok(UploadOutcome::SkippedDuplicate {
                        reason: "duplicate checksum".to_string(),
                    });
                }
            }
        }

        let existing_id = if !self.config.overwrite {
            self.store.find_by_name(&folder_id, &filename).await?
        } else {
            None
        };

        let mime = mime_guess::from_path(path).first_or_octet_stream();
        let mut metadata = FileMetadata::new(filename.as_str())
            .with_parent(folder_id.as_str())
            .with_mime_type(mime.essence_str());
        if let Some(digest) = &digest {
            metadata = metadata.with_sha256(digest);
        }

        let result = match &existing_id {
            Some(id) => {
                tracing::info!(file = %filename, id = %id, "Updating");
                self.store.update_file(id, &metadata, path).await
            }
            None => {
                tracing::info!(file = %filename, "Uploading");
                self.store.upload_file(&metadata, path).await
            }
        };

        match result {
            Ok(_) => Ok(if existing_id.is_some() {
                UploadOutcome::Updated
            } else {
                UploadOutcome::Created
            }),
            Err(e) => {
                tracing::error!(file = %filename, error = %e, "Upload failed");
                Ok(UploadOutcome::Failed {
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Category folder under the type folder, resolved once per category.
    async fn category_folder(&mut self, category: MediaCategory) -> DriveResult<String> {
        if let Some(id) = self.category_folders.get(&category) {
            return Ok(id.clone());
        }
        let id = self
            .store
            .ensure_folder(category.folder_name(), Some(&self.type_folder_id))
            .await?;
        self.category_folders.insert(category, id.clone());
        Ok(id)
    }
}

/// Discover and filter input files, resolve the folder chain, and process
/// everything. Returns the collected run report.
pub async fn run_upload<S: DriveStore + ?Sized>(
    store: &S,
    config: &Config,
) -> anyhow::Result<RunReport> {
    let filter = ExtensionFilter::parse(&config.allowed_ext);
    let files = scanner::filter_files(scanner::walk_files(&config.input_path)?, &filter);
    tracing::info!(
        count = files.len(),
        input = %config.input_path.display(),
        "Discovered files"
    );

    let type_folder_id = resolve_chain(store, config)
        .await
        .context("Failed to resolve the remote folder chain")?;

    let mut uploader = Uploader::new(store, config, type_folder_id);
    uploader
        .run(&files)
        .await
        .context("Upload run aborted by a remote failure")
}
