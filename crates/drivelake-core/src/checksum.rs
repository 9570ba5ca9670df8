//! Content digest computation.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{AppError, AppResult};

/// Block size for streaming file hashing (1 MiB).
pub const HASH_BLOCK_SIZE: usize = 1024 * 1024;

/// Compute the SHA-256 digest of a byte slice as lowercase hex.
pub fn sha256_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Compute the SHA-256 digest of a file as lowercase hex.
///
/// Streams the file in fixed-size blocks so large files are never held in
/// memory at once.
pub fn sha256_file(path: &Path) -> AppResult<String> {
    let mut file =
        File::open(path).map_err(|e| AppError::io(path.display().to_string(), e))?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; HASH_BLOCK_SIZE];

    loop {
        let bytes_read = file
            .read(&mut buffer)
            .map_err(|e| AppError::io(path.display().to_string(), e))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sha256_bytes_known_value() {
        // sha256("") is a fixed constant
        assert_eq!(
            sha256_bytes(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sha256_bytes_deterministic() {
        let first = sha256_bytes(b"hello world");
        let second = sha256_bytes(b"hello world");
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert_ne!(first, sha256_bytes(b"hello worlds"));
    }

    #[test]
    fn test_sha256_file_matches_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");

        let mut file = File::create(&path).unwrap();
        file.write_all(b"some file content").unwrap();
        drop(file);

        assert_eq!(
            sha256_file(&path).unwrap(),
            sha256_bytes(b"some file content")
        );
    }

    #[test]
    fn test_sha256_file_streams_across_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.bin");

        // Spans multiple read blocks with a partial tail
        let data = vec![0xabu8; HASH_BLOCK_SIZE * 2 + 12345];
        std::fs::write(&path, &data).unwrap();

        assert_eq!(sha256_file(&path).unwrap(), sha256_bytes(&data));
    }

    #[test]
    fn test_sha256_file_unreadable() {
        let result = sha256_file(Path::new("/nonexistent/file.bin"));
        assert!(matches!(result, Err(AppError::Io { .. })));
    }
}
