//! Error types for the core crate.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl AppError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for core operations
pub type AppResult<T> = Result<T, AppError>;
