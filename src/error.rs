//! Custom error types for Duffel
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.
//!
//! The variants split into two families: `Config` errors abort the entire run
//! before any source is touched, while the remaining variants are recoverable
//! per-source failures that the runner counts and moves past.

use thiserror::Error;

/// The main error type for Duffel operations
#[derive(Error, Debug)]
pub enum DuffelError {
    /// Configuration-related errors (missing variables, unreadable source,
    /// unwritable destination) — fatal, the run never starts
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Compression of a source directory failed
    #[error("Compression failed for {source_dir}: {detail}")]
    Compression { source_dir: String, detail: String },

    /// Archive integrity verification failed
    #[error("Verification failed for {archive}: {detail}")]
    Verification { archive: String, detail: String },
}

impl DuffelError {
    /// Create a compression error for a source directory
    pub fn compression(source_dir: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Compression {
            source_dir: source_dir.into(),
            detail: detail.into(),
        }
    }

    /// Create a verification error for an archive
    pub fn verification(archive: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Verification {
            archive: archive.into(),
            detail: detail.into(),
        }
    }

    /// Check if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for DuffelError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DuffelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Duffel operations
pub type DuffelResult<T> = Result<T, DuffelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DuffelError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_compression_error() {
        let err = DuffelError::compression("/data/a", "tar exited with status 2");
        assert_eq!(
            err.to_string(),
            "Compression failed for /data/a: tar exited with status 2"
        );
        assert!(!err.is_config());
    }

    #[test]
    fn test_verification_error() {
        let err = DuffelError::verification("a_20250101_120000.tar.gz", "archive is empty");
        assert_eq!(
            err.to_string(),
            "Verification failed for a_20250101_120000.tar.gz: archive is empty"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let duffel_err: DuffelError = io_err.into();
        assert!(matches!(duffel_err, DuffelError::Io(_)));
    }
}
