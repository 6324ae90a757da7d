//! Archive integrity verification
//!
//! Confirms an archive exists and is non-empty, then computes its SHA-256 by
//! streaming the file in fixed-size chunks. Archive sizes are unbounded, so
//! the file is never loaded into memory whole.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;
use sha2::{Digest, Sha256};

use crate::error::{DuffelError, DuffelResult};

use super::manifest::format_mb;

const CHUNK_SIZE: usize = 8192;

/// Verify an archive and return its checksum and size
///
/// A zero-byte archive is treated as corrupt, never as "empty but valid".
/// The measured size is returned alongside the checksum so the manifest
/// writer does not need to re-read the file.
pub fn verify(archive: &Path) -> DuffelResult<(String, u64)> {
    let name = archive.display().to_string();

    if !archive.exists() {
        return Err(DuffelError::verification(name, "archive not found"));
    }

    let size_bytes = fs::metadata(archive)
        .map_err(|e| {
            DuffelError::verification(name.as_str(), format!("failed to stat archive: {}", e))
        })?
        .len();

    if size_bytes == 0 {
        return Err(DuffelError::verification(name, "archive size is 0"));
    }

    info!("Archive size: {}", format_mb(size_bytes));

    let file = File::open(archive).map_err(|e| {
        DuffelError::verification(name.as_str(), format!("failed to open archive: {}", e))
    })?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; CHUNK_SIZE];

    loop {
        let count = reader
            .read(&mut buffer)
            .map_err(|e| DuffelError::verification(name.as_str(), format!("read failed: {}", e)))?;
        if count == 0 {
            break;
        }
        hasher.update(&buffer[..count]);
    }

    let checksum = hex::encode(hasher.finalize());
    info!("Checksum: {}", checksum);

    Ok((checksum, size_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_archive_fails() {
        let temp_dir = TempDir::new().unwrap();
        let err = verify(&temp_dir.path().join("absent.tar.gz")).unwrap_err();
        assert!(err.to_string().contains("archive not found"));
    }

    #[test]
    fn test_zero_byte_archive_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.tar.gz");
        fs::write(&path, b"").unwrap();

        let err = verify(&path).unwrap_err();
        assert!(err.to_string().contains("archive size is 0"));
    }

    #[test]
    fn test_known_checksum() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.tar.gz");
        fs::write(&path, b"hello world").unwrap();

        let (checksum, size_bytes) = verify(&path).unwrap();
        assert_eq!(size_bytes, 11);
        assert_eq!(
            checksum,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_verify_is_deterministic() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.tar.gz");
        fs::write(&path, vec![0xA5u8; 3 * CHUNK_SIZE + 17]).unwrap();

        let (first, _) = verify(&path).unwrap();
        let (second, _) = verify(&path).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }
}
