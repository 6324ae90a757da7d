//! Backup run orchestration
//!
//! Drives one run end to end: configuration validation, then every source
//! through compress → verify → manifest with per-source failure isolation,
//! then rotation against the full destination directory, then the summary.
//! A failing source is counted and skipped; only startup validation can
//! abort the run before any work happens.

use std::fs;
use std::path::Path;

use chrono::{Local, NaiveDateTime};
use log::{error, info};

use crate::config::Config;
use crate::error::DuffelResult;

use super::manifest::{format_mb, manifest_path, Manifest};
use super::{archiver, rotation, verifier, TIMESTAMP_FORMAT};

/// Counters reported at the end of a run
///
/// Ephemeral, in-memory only; never persisted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Sources attempted this run
    pub attempted: usize,
    /// Sources backed up successfully
    pub succeeded: usize,
    /// Sources that failed at some pipeline stage
    pub failed: usize,
    /// Old archives rotated out (or reported, in dry-run)
    pub rotated: usize,
    /// Total size of archives created this run
    pub total_bytes: u64,
}

/// Drives a single backup run
pub struct BackupRunner<'a> {
    config: &'a Config,
    dry_run: bool,
}

impl<'a> BackupRunner<'a> {
    /// Create a runner for the given configuration
    pub fn new(config: &'a Config, dry_run: bool) -> Self {
        Self { config, dry_run }
    }

    /// Run the full backup pipeline once
    ///
    /// Returns the run summary. The only error this propagates is a failed
    /// destination check at startup (sources were already validated when the
    /// configuration was loaded); per-source and rotation failures are
    /// logged, counted, and the run carries on to completion.
    pub fn run(&self) -> DuffelResult<RunSummary> {
        let now = Local::now().naive_local();
        let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
        let mut summary = RunSummary::default();

        info!("Starting backup run");

        self.config.validate_destination()?;
        info!(
            "Backing up {} source(s) to {}",
            self.config.sources.len(),
            self.config.destination.display()
        );

        if self.dry_run {
            info!("[DRY-RUN] No files will be created or deleted");
            info!(
                "[DRY-RUN] Retention: {} days, keep at least {}",
                self.config.retention.retention_days, self.config.retention.min_backups
            );
        }

        for source in &self.config.sources {
            summary.attempted += 1;
            match self.process_source(source, &timestamp) {
                Ok(bytes) => {
                    summary.succeeded += 1;
                    summary.total_bytes += bytes;
                }
                Err(e) => {
                    error!("Backup of {} failed: {}", source.display(), e);
                    summary.failed += 1;
                }
            }
        }

        match self.rotate(now) {
            Ok(rotated) => summary.rotated = rotated,
            Err(e) => error!("Rotation failed: {}", e),
        }

        self.report(&summary);
        Ok(summary)
    }

    /// Run one source through the pipeline, returning the archive size
    ///
    /// Each stage returns an explicit `Result`; the first failure is the
    /// source's outcome for this run. In dry-run mode nothing touches the
    /// filesystem — the decisions are logged and counted as a success.
    fn process_source(&self, source: &Path, timestamp: &str) -> DuffelResult<u64> {
        if self.dry_run {
            let archive = self
                .config
                .destination
                .join(archiver::archive_file_name(source, timestamp));
            info!("[DRY-RUN] Would compress {}", source.display());
            info!("[DRY-RUN] Would create {}", archive.display());
            info!(
                "[DRY-RUN] Would create manifest {}",
                manifest_path(&archive).display()
            );
            return Ok(0);
        }

        let archive = archiver::compress(source, &self.config.destination, timestamp)?;
        let (checksum, size_bytes) = verifier::verify(&archive)?;

        let manifest = Manifest::new(source, &archive, timestamp, size_bytes, &checksum);
        manifest.write(&archive)?;

        Ok(size_bytes)
    }

    /// Plan and apply rotation over the whole destination directory
    ///
    /// Candidate archives are deleted together with their manifest sidecars.
    /// A deletion that fails is logged and skipped; it does not count as
    /// rotated and does not abort the run.
    fn rotate(&self, now: NaiveDateTime) -> DuffelResult<usize> {
        let archives = rotation::list_archives(&self.config.destination)?;
        let candidates = rotation::plan_rotation(&archives, self.config.retention, now);

        if self.dry_run {
            info!(
                "[DRY-RUN] Found {} old backup(s) that would be deleted:",
                candidates.len()
            );
            for candidate in &candidates {
                info!("[DRY-RUN]   - {}", file_name(candidate));
            }
            return Ok(candidates.len());
        }

        let mut rotated = 0;
        for archive in candidates {
            info!("Deleting old backup: {}", file_name(&archive));
            if let Err(e) = fs::remove_file(&archive) {
                error!("Failed to delete {}: {}", archive.display(), e);
                continue;
            }
            rotated += 1;

            let sidecar = manifest_path(&archive);
            if sidecar.exists() {
                if let Err(e) = fs::remove_file(&sidecar) {
                    error!("Failed to delete manifest {}: {}", sidecar.display(), e);
                }
            }
        }

        Ok(rotated)
    }

    /// Emit the end-of-run summary
    fn report(&self, summary: &RunSummary) {
        if self.dry_run {
            info!("=== [DRY-RUN] Backup Summary ===");
            info!("Total sources: {}", summary.attempted);
            info!("Would create: {} backup(s)", summary.succeeded);
            info!("Would delete: {} old backup(s)", summary.rotated);
        } else {
            info!("=== Backup Summary ===");
            info!("Total sources: {}", summary.attempted);
            info!("Successful: {}", summary.succeeded);
            info!("Failed: {}", summary.failed);
            info!("Old backups deleted: {}", summary.rotated);
            info!("Total backup size: {}", format_mb(summary.total_bytes));
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
