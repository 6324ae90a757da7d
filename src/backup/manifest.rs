//! Backup manifests
//!
//! Every verified archive gets a JSON sidecar recording where it came from,
//! when it was created, how large it is, and its checksum. The sidecar is
//! written once, immediately after verification, and is never mutated; it is
//! deleted together with its archive during rotation.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{DuffelError, DuffelResult};

use super::{ARCHIVE_SUFFIX, MANIFEST_SUFFIX};

/// Manifest sidecar describing one archive
///
/// Field names are a stable contract: external tooling reads these files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Path of the archive this manifest describes
    pub backup_file: String,
    /// Source directory the archive was created from
    pub source: String,
    /// Creation timestamp (`YYYYMMDD_HHMMSS`, matches the filename)
    pub created: String,
    /// Archive size in bytes
    pub size_bytes: u64,
    /// Archive size as a human-readable megabyte string
    pub size_human: String,
    /// SHA-256 of the archive contents, lowercase hex
    pub checksum_sha256: String,
}

impl Manifest {
    /// Describe a verified archive
    pub fn new(
        source: &Path,
        archive: &Path,
        timestamp: &str,
        size_bytes: u64,
        checksum: &str,
    ) -> Self {
        Self {
            backup_file: archive.display().to_string(),
            source: source.display().to_string(),
            created: timestamp.to_string(),
            size_bytes,
            size_human: format_mb(size_bytes),
            checksum_sha256: checksum.to_string(),
        }
    }

    /// Write the manifest to its archive's sidecar path
    pub fn write(&self, archive: &Path) -> DuffelResult<PathBuf> {
        let path = manifest_path(archive);

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| DuffelError::Json(format!("Failed to serialize manifest: {}", e)))?;

        fs::write(&path, json).map_err(|e| {
            DuffelError::Io(format!("Failed to write manifest {}: {}", path.display(), e))
        })?;

        info!("Manifest created: {}", path.display());
        Ok(path)
    }

    /// Read a manifest back from disk
    pub fn load(path: &Path) -> DuffelResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            DuffelError::Io(format!("Failed to read manifest {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            DuffelError::Json(format!("Failed to parse manifest {}: {}", path.display(), e))
        })
    }
}

/// Sidecar path for an archive: same name with the compression suffix
/// swapped for the manifest suffix
pub fn manifest_path(archive: &Path) -> PathBuf {
    let name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.strip_suffix(ARCHIVE_SUFFIX).unwrap_or(&name);
    archive.with_file_name(format!("{}{}", stem, MANIFEST_SUFFIX))
}

/// Format a byte count as the manifest's `"<MB> MB"` contract
pub fn format_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}
