//! Run configuration.
//!
//! Built once at startup from the command line and passed by reference into
//! every component; nothing mutates it afterwards.

use std::path::PathBuf;

use chrono::{Datelike, Utc};

use crate::error::{AppError, AppResult};

/// Immutable configuration for one upload run.
#[derive(Clone, Debug)]
pub struct Config {
    /// OAuth client secrets file.
    pub credentials_path: PathBuf,
    /// Cached authorization token file.
    pub token_path: PathBuf,
    /// Upload into a shared drive instead of the caller's own storage.
    pub use_shared_drive: bool,
    /// Shared drive identifier, required when `use_shared_drive` is set.
    pub drive_id: Option<String>,
    /// Name of the top-level remote folder.
    pub root_folder: String,
    /// Project tag, third level of the folder chain.
    pub project: String,
    /// Type tag, fourth level of the folder chain.
    pub type_tag: String,
    /// Local file or directory to upload.
    pub input_path: PathBuf,
    /// Year override; defaults to the current UTC year.
    pub year: Option<i32>,
    /// Month override; defaults to the current UTC month.
    pub month: Option<u32>,
    /// Comma-separated extension allow-list; empty means no filtering.
    pub allowed_ext: String,
    /// Always create new files instead of updating same-named ones.
    pub overwrite: bool,
    /// Compute a SHA-256 digest and attach it to uploaded files.
    pub checksum: bool,
    /// Skip files whose digest already exists in the target folder.
    pub dedupe_by_checksum: bool,
    /// Upload chunk size in MiB.
    pub chunk_size_mb: usize,
    /// Reserved for future use; accepted but currently ignored.
    pub validate_basic: bool,
}

impl Config {
    pub fn validate(&self) -> AppResult<()> {
        if self.root_folder.trim().is_empty() {
            return Err(AppError::Config("root folder name must not be empty".into()));
        }
        if self.use_shared_drive
            && self.drive_id.as_deref().map_or(true, |id| id.trim().is_empty())
        {
            return Err(AppError::Config(
                "--drive-id is required when --use-shared-drive is set".into(),
            ));
        }
        if self.chunk_size_mb == 0 {
            return Err(AppError::Config("chunk size must be at least 1 MiB".into()));
        }
        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err(AppError::Config(format!(
                    "month must be between 1 and 12, got {}",
                    month
                )));
            }
        }
        Ok(())
    }

    /// Shared drive id, only when shared-drive mode is enabled.
    pub fn shared_drive_id(&self) -> Option<&str> {
        if self.use_shared_drive {
            self.drive_id.as_deref().filter(|id| !id.is_empty())
        } else {
            None
        }
    }

    /// Year and month the folder chain is built for, defaulting to the
    /// current UTC date.
    pub fn target_year_month(&self) -> (i32, u32) {
        let now = Utc::now();
        (
            self.year.unwrap_or_else(|| now.year()),
            self.month.unwrap_or_else(|| now.month()),
        )
    }

    pub fn chunk_size_bytes(&self) -> usize {
        self.chunk_size_mb * 1024 * 1024
    }

    /// Whether duplicate detection by digest is in effect.
    pub fn dedupe_enabled(&self) -> bool {
        self.checksum && self.dedupe_by_checksum
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            credentials_path: PathBuf::from("credentials.json"),
            token_path: PathBuf::from("token.json"),
            use_shared_drive: false,
            drive_id: None,
            root_folder: "DataLake".to_string(),
            project: "creative".to_string(),
            type_tag: "media".to_string(),
            input_path: PathBuf::new(),
            year: None,
            month: None,
            allowed_ext: String::new(),
            overwrite: false,
            checksum: true,
            dedupe_by_checksum: true,
            chunk_size_mb: 16,
            validate_basic: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_shared_drive_requires_id() {
        let config = Config {
            use_shared_drive: true,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            use_shared_drive: true,
            drive_id: Some("0ABCdrive".to_string()),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.shared_drive_id(), Some("0ABCdrive"));
    }

    #[test]
    fn test_drive_id_ignored_without_shared_drive() {
        let config = Config {
            drive_id: Some("0ABCdrive".to_string()),
            ..Config::default()
        };
        assert_eq!(config.shared_drive_id(), None);
    }

    #[test]
    fn test_month_bounds() {
        let config = Config {
            month: Some(13),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            month: Some(12),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let config = Config {
            chunk_size_mb: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_year_month_override() {
        let config = Config {
            year: Some(2024),
            month: Some(7),
            ..Config::default()
        };
        assert_eq!(config.target_year_month(), (2024, 7));
    }

    #[test]
    fn test_dedupe_requires_checksum() {
        let config = Config {
            checksum: false,
            dedupe_by_checksum: true,
            ..Config::default()
        };
        assert!(!config.dedupe_enabled());
        assert!(Config::default().dedupe_enabled());
    }
}
