//! Runtime configuration for Duffel
//!
//! Configuration is read from environment variables once at process start and
//! passed by reference into the runner — there are no ambient globals. Loading
//! and validation are separate steps: `from_env` reports every missing or
//! malformed variable, `validate` checks the filesystem side (readable
//! sources, writable destination) and is the only stage allowed to abort a
//! run before any source is touched.
//!
//! ## Environment variables
//!
//! - `BACKUP_SOURCES`: comma-separated list of directories to back up
//! - `BACKUP_DESTINATION`: directory that receives archives and manifests
//! - `RETENTION_DAYS`: archives newer than this many days are never deleted
//! - `MIN_BACKUPS_TO_KEEP`: most-recent archives kept regardless of age
//! - `LOG_LEVEL`: log verbosity (error, warn, info, debug, trace)

use std::fs;
use std::path::PathBuf;

use crate::error::{DuffelError, DuffelResult};

const ENV_SOURCES: &str = "BACKUP_SOURCES";
const ENV_DESTINATION: &str = "BACKUP_DESTINATION";
const ENV_RETENTION_DAYS: &str = "RETENTION_DAYS";
const ENV_MIN_BACKUPS: &str = "MIN_BACKUPS_TO_KEEP";
const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// Retention policy for rotating old archives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Archives newer than this many days are never deleted
    pub retention_days: u32,
    /// Number of most-recent archives kept regardless of age
    pub min_backups: usize,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directories to back up
    pub sources: Vec<PathBuf>,
    /// Directory that receives archives and manifests
    pub destination: PathBuf,
    /// Rotation policy
    pub retention: RetentionPolicy,
    /// Log verbosity name from the environment
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// All missing variables are collected and reported in a single error so
    /// the operator can fix the environment in one pass.
    pub fn from_env() -> DuffelResult<Self> {
        let missing: Vec<&str> = [
            ENV_SOURCES,
            ENV_DESTINATION,
            ENV_RETENTION_DAYS,
            ENV_MIN_BACKUPS,
            ENV_LOG_LEVEL,
        ]
        .into_iter()
        .filter(|name| env_value(name).is_none())
        .collect();

        if !missing.is_empty() {
            return Err(DuffelError::Config(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        let sources = env_value(ENV_SOURCES)
            .unwrap_or_default()
            .split(',')
            .map(|s| PathBuf::from(s.trim()))
            .collect();

        let retention_days = parse_env_int(ENV_RETENTION_DAYS)?;
        let min_backups = parse_env_int(ENV_MIN_BACKUPS)?;

        Ok(Self {
            sources,
            destination: PathBuf::from(env_value(ENV_DESTINATION).unwrap_or_default()),
            retention: RetentionPolicy {
                retention_days,
                min_backups: min_backups as usize,
            },
            log_level: env_value(ENV_LOG_LEVEL).unwrap_or_default(),
        })
    }

    /// Apply CLI overrides on top of the environment configuration
    pub fn apply_overrides(&mut self, sources: Option<Vec<PathBuf>>, retention_days: Option<u32>) {
        if let Some(sources) = sources {
            self.sources = sources;
        }
        if let Some(days) = retention_days {
            self.retention.retention_days = days;
        }
    }

    /// Validate filesystem preconditions before any backup work begins
    ///
    /// Checks every source exists, is a directory, and is readable; creates
    /// the destination directory if absent and checks it is writable. Any
    /// failure here aborts the run with no sources processed. A source that
    /// disappears after this check is a recoverable per-source failure, not
    /// a startup failure.
    pub fn validate(&self) -> DuffelResult<()> {
        self.validate_sources()?;
        self.validate_destination()
    }

    /// Check every configured source exists, is a directory, and is readable
    pub fn validate_sources(&self) -> DuffelResult<()> {
        if self.sources.is_empty() {
            return Err(DuffelError::Config("No backup sources configured".into()));
        }

        for source in &self.sources {
            if !source.is_dir() {
                return Err(DuffelError::Config(format!(
                    "Backup source does not exist: {}",
                    source.display()
                )));
            }
            // Readability probe: listing the directory is what tar will do
            fs::read_dir(source).map_err(|e| {
                DuffelError::Config(format!(
                    "Backup source not readable: {}: {}",
                    source.display(),
                    e
                ))
            })?;
        }

        Ok(())
    }

    /// Create the destination directory if absent and check it is writable
    pub fn validate_destination(&self) -> DuffelResult<()> {
        fs::create_dir_all(&self.destination).map_err(|e| {
            DuffelError::Config(format!(
                "Failed to create backup destination {}: {}",
                self.destination.display(),
                e
            ))
        })?;

        let metadata = fs::metadata(&self.destination).map_err(|e| {
            DuffelError::Config(format!(
                "Backup destination not accessible: {}: {}",
                self.destination.display(),
                e
            ))
        })?;
        if metadata.permissions().readonly() {
            return Err(DuffelError::Config(format!(
                "Backup destination not writable: {}",
                self.destination.display()
            )));
        }

        Ok(())
    }

    /// Map the configured log level name to a filter for the logger
    pub fn level_filter(&self) -> log::LevelFilter {
        match self.log_level.to_lowercase().as_str() {
            "error" => log::LevelFilter::Error,
            "warn" | "warning" => log::LevelFilter::Warn,
            "debug" => log::LevelFilter::Debug,
            "trace" => log::LevelFilter::Trace,
            _ => log::LevelFilter::Info,
        }
    }
}

/// Trimmed, non-empty value of an environment variable
fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a non-negative integer environment value
fn parse_env_int(name: &str) -> DuffelResult<u32> {
    let raw = env_value(name).unwrap_or_default();
    raw.parse().map_err(|_| {
        DuffelError::Config(format!(
            "{} must be a non-negative integer: {:?}",
            name, raw
        ))
    })
}
