//! Backup pipeline for Duffel
//!
//! Each configured source directory flows through three stages, in order:
//!
//! - `archiver`: compresses the directory into a timestamped tar.gz archive
//! - `verifier`: confirms the archive is non-empty and computes its SHA-256
//! - `manifest`: records a JSON sidecar describing the archive
//!
//! After every source has been processed, `rotation` plans which old archives
//! to retire and the runner deletes them (archive plus sidecar). The whole
//! run is driven by `runner::BackupRunner`, which isolates failures per
//! source so one bad directory never aborts the rest of the run.
//!
//! # Filename contract
//!
//! Archives are named `{source_name}_{YYYYMMDD_HHMMSS}.tar.gz`. The timestamp
//! tokens are fixed width and sortable, so archives can be re-discovered and
//! re-ordered from filenames alone. Manifests carry the same name with the
//! compression suffix swapped for `.json`. Files in the destination that do
//! not match the contract are ignored by rotation, never deleted.

mod archiver;
mod manifest;
mod rotation;
mod runner;
mod verifier;

pub use archiver::{archive_file_name, compress};
pub use manifest::{format_mb, manifest_path, Manifest};
pub use rotation::{list_archives, parse_archive_timestamp, plan_rotation};
pub use runner::{BackupRunner, RunSummary};
pub use verifier::verify;

/// Suffix of every archive produced by the pipeline
pub const ARCHIVE_SUFFIX: &str = ".tar.gz";

/// Suffix of the manifest sidecar written next to each archive
pub const MANIFEST_SUFFIX: &str = ".json";

/// Timestamp format embedded in archive filenames (fixed width, sortable)
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
