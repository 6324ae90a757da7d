//! Archive creation
//!
//! Compresses a source directory into a timestamped tar.gz archive by
//! invoking the system `tar`. Compression failures are recoverable per-source
//! errors: the caller logs them and moves on to the next source.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::info;

use crate::error::{DuffelError, DuffelResult};

use super::ARCHIVE_SUFFIX;

/// Build the archive filename for a source directory and timestamp
///
/// The source's final path component becomes the archive's name prefix, so
/// `/data/photos` backed up at `20250101_120000` yields
/// `photos_20250101_120000.tar.gz`.
pub fn archive_file_name(source: &Path, timestamp: &str) -> String {
    format!("{}_{}{}", source_name(source), timestamp, ARCHIVE_SUFFIX)
}

/// Compress a source directory into the destination directory
///
/// Runs `tar -czf <archive> -C <parent> <dir>` so the archive contains the
/// directory by name rather than its absolute path. Returns the archive path
/// on success. On failure no output file is left behind: a truncated archive
/// must never be mistaken for a completed backup by later stages.
pub fn compress(source: &Path, destination: &Path, timestamp: &str) -> DuffelResult<PathBuf> {
    let output_path = destination.join(archive_file_name(source, timestamp));

    info!("Compressing {}", source.display());

    let mut parent = source.parent().unwrap_or_else(|| Path::new("."));
    if parent.as_os_str().is_empty() {
        parent = Path::new(".");
    }

    let result = Command::new("tar")
        .arg("-czf")
        .arg(&output_path)
        .arg("-C")
        .arg(parent)
        .arg(source_name(source))
        .output();

    match result {
        Ok(output) if output.status.success() => {
            info!("Backup created: {}", output_path.display());
            Ok(output_path)
        }
        Ok(output) => {
            remove_partial(&output_path);
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(DuffelError::compression(
                source.display().to_string(),
                format!("tar exited with {}: {}", output.status, stderr.trim()),
            ))
        }
        Err(e) => {
            remove_partial(&output_path);
            Err(DuffelError::compression(
                source.display().to_string(),
                format!("failed to run tar: {}", e),
            ))
        }
    }
}

/// Final path component of a source directory
fn source_name(source: &Path) -> String {
    source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "root".to_string())
}

/// tar creates its output file before reading the source, so a failed
/// invocation can leave a truncated file behind
fn remove_partial(path: &Path) {
    if path.exists() {
        let _ = fs::remove_file(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_archive_file_name() {
        assert_eq!(
            archive_file_name(Path::new("/data/photos"), "20250101_120000"),
            "photos_20250101_120000.tar.gz"
        );
    }

    #[test]
    fn test_compress_creates_archive() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("docs");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("notes.txt"), "hello").unwrap();

        let destination = temp_dir.path().join("backups");
        fs::create_dir(&destination).unwrap();

        let archive = compress(&source, &destination, "20250101_120000").unwrap();

        assert_eq!(
            archive.file_name().unwrap().to_string_lossy(),
            "docs_20250101_120000.tar.gz"
        );
        assert!(archive.exists());
        assert!(fs::metadata(&archive).unwrap().len() > 0);
    }

    #[test]
    fn test_compress_missing_source_leaves_no_file() {
        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("backups");
        fs::create_dir(&destination).unwrap();

        let missing = temp_dir.path().join("gone");
        let err = compress(&missing, &destination, "20250101_120000").unwrap_err();

        assert!(matches!(err, DuffelError::Compression { .. }));
        assert_eq!(fs::read_dir(&destination).unwrap().count(), 0);
    }
}
