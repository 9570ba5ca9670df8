//! Drive client errors.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum DriveError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Drive API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Upload protocol error: {0}")]
    Protocol(String),
}

impl DriveError {
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        DriveError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for Drive operations
pub type DriveResult<T> = Result<T, DriveError>;
