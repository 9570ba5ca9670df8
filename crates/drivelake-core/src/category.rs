//! Media category classification by file extension.

/// Media grouping a file is placed under in the remote hierarchy.
///
/// Classification is a pure function of the file extension; anything outside
/// the fixed table maps to `Others`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaCategory {
    Images,
    Videos,
    Audios,
    Docs,
    Others,
}

impl MediaCategory {
    /// Classify a file extension (with or without a leading dot,
    /// case-insensitive).
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "bmp" | "tiff" | "svg" | "webp" => {
                MediaCategory::Images
            }
            "mp4" | "avi" | "mov" | "mkv" | "flv" | "wmv" | "webm" => MediaCategory::Videos,
            "mp3" | "wav" | "aac" | "flac" | "ogg" | "m4a" => MediaCategory::Audios,
            "pdf" | "doc" | "docx" | "xls" | "xlsx" | "ppt" | "pptx" | "txt" | "csv" | "rtf" => {
                MediaCategory::Docs
            }
            _ => MediaCategory::Others,
        }
    }

    /// Remote folder name for this category.
    pub fn folder_name(&self) -> &'static str {
        match self {
            MediaCategory::Images => "images",
            MediaCategory::Videos => "videos",
            MediaCategory::Audios => "audios",
            MediaCategory::Docs => "docs",
            MediaCategory::Others => "others",
        }
    }
}
