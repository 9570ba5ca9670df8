//! Drivelake core library
//!
//! Shared building blocks for the uploader: run configuration, error types,
//! media categorization, content hashing, local file discovery, and the
//! end-of-run report.

pub mod category;
pub mod checksum;
pub mod config;
pub mod error;
pub mod report;
pub mod scanner;

// Re-export commonly used types
pub use category::MediaCategory;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use report::{FileReport, RunReport, UploadOutcome};
pub use scanner::ExtensionFilter;
