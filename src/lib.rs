//! Duffel - scheduled directory backup tool
//!
//! This library provides the core functionality for the Duffel backup tool.
//! It compresses each configured source directory into a timestamped tar.gz
//! archive, verifies archive integrity with a streaming SHA-256 checksum,
//! records a JSON manifest next to each archive, and retires old archives
//! according to an age- and count-based retention policy.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Environment-based configuration and startup validation
//! - `error`: Custom error types
//! - `backup`: The backup pipeline (archiver, verifier, manifest, rotation,
//!   runner)
//!
//! # Example
//!
//! ```rust,ignore
//! use duffel::backup::BackupRunner;
//! use duffel::config::Config;
//!
//! let config = Config::from_env()?;
//! config.validate()?;
//!
//! let summary = BackupRunner::new(&config, false).run()?;
//! println!("{} of {} sources backed up", summary.succeeded, summary.attempted);
//! ```

pub mod backup;
pub mod config;
pub mod error;

pub use error::DuffelError;
