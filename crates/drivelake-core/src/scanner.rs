//! Local file discovery and extension filtering.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{AppError, AppResult};

/// Case-insensitive extension allow-list parsed from a comma-separated
/// option string.
///
/// Entries are trimmed and lower-cased; a leading dot is optional. An empty
/// filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct ExtensionFilter {
    allowed: HashSet<String>,
}

impl ExtensionFilter {
    /// Parse `"mp4, .MOV"` into `{".mp4", ".mov"}`. Empty input yields an
    /// empty filter.
    pub fn parse(raw: &str) -> Self {
        let allowed = raw
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(|e| {
                let e = e.to_ascii_lowercase();
                if e.starts_with('.') {
                    e
                } else {
                    format!(".{}", e)
                }
            })
            .collect();
        ExtensionFilter { allowed }
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Whether a path passes the filter. Files without an extension only
    /// pass when the filter is empty.
    pub fn matches(&self, path: &Path) -> bool {
        if self.allowed.is_empty() {
            return true;
        }
        match path.extension() {
            Some(ext) => {
                let ext = format!(".{}", ext.to_string_lossy().to_ascii_lowercase());
                self.allowed.contains(&ext)
            }
            None => false,
        }
    }
}

/// Enumerate every regular file under `root`, or `root` itself if it is a
/// single file. Symlinked directories are not followed; unreadable entries
/// are skipped with a warning. Order follows the underlying traversal.
pub fn walk_files(root: &Path) -> AppResult<Vec<PathBuf>> {
    let meta = std::fs::metadata(root)
        .map_err(|e| AppError::io(root.display().to_string(), e))?;
    if meta.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable entry during scan");
                continue;
            }
        };
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Narrow a discovered file list by the allow-list.
pub fn filter_files(files: Vec<PathBuf>, filter: &ExtensionFilter) -> Vec<PathBuf> {
    if filter.is_empty() {
        return files;
    }
    files.into_iter().filter(|f| filter.matches(f)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_tree(dir: &Path) {
        fs::write(dir.join("photo.jpg"), b"jpeg").unwrap();
        fs::write(dir.join("clip.mp4"), b"mp4").unwrap();
        fs::create_dir(dir.join("nested")).unwrap();
        fs::write(dir.join("nested/notes.txt"), b"text").unwrap();
        fs::write(dir.join("nested/README"), b"no extension").unwrap();
    }

    #[test]
    fn test_walk_files_recursive() {
        let dir = TempDir::new().unwrap();
        create_tree(dir.path());

        let files = walk_files(dir.path()).unwrap();
        assert_eq!(files.len(), 4);
        assert!(files.iter().any(|f| f.ends_with("nested/notes.txt")));
    }

    #[test]
    fn test_walk_files_single_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("only.png");
        fs::write(&path, b"png").unwrap();

        let files = walk_files(&path).unwrap();
        assert_eq!(files, vec![path]);
    }

    #[test]
    fn test_walk_files_missing_root() {
        let result = walk_files(Path::new("/nonexistent/input"));
        assert!(matches!(result, Err(AppError::Io { .. })));
    }

    #[test]
    fn test_filter_parse_normalizes() {
        let filter = ExtensionFilter::parse("mp4, .MOV , ,jpeg");
        assert!(filter.matches(Path::new("a.mp4")));
        assert!(filter.matches(Path::new("b.mov")));
        assert!(filter.matches(Path::new("c.MOV")));
        assert!(filter.matches(Path::new("d.JPEG")));
        assert!(!filter.matches(Path::new("e.jpg")));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = ExtensionFilter::parse("");
        assert!(filter.is_empty());
        assert!(filter.matches(Path::new("anything.xyz")));
        assert!(filter.matches(Path::new("no_extension")));
    }

    #[test]
    fn test_no_extension_rejected_by_nonempty_filter() {
        let filter = ExtensionFilter::parse("txt");
        assert!(!filter.matches(Path::new("Makefile")));
    }

    #[test]
    fn test_filter_files_allow_list() {
        let dir = TempDir::new().unwrap();
        create_tree(dir.path());

        let filter = ExtensionFilter::parse("mp4,mov");
        let files = filter_files(walk_files(dir.path()).unwrap(), &filter);
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("clip.mp4"));
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let dir = TempDir::new().unwrap();
        create_tree(dir.path());

        let filter = ExtensionFilter::parse("jpg,txt");
        let once = filter_files(walk_files(dir.path()).unwrap(), &filter);
        let twice = filter_files(once.clone(), &filter);
        assert_eq!(once, twice);
    }
}
