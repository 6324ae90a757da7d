//! Configuration module for Duffel
//!
//! This module provides configuration management including:
//! - Environment-based configuration loading
//! - Startup path validation (fail fast, before any backup work)
//! - Retention policy settings

pub mod settings;

pub use settings::{Config, RetentionPolicy};
