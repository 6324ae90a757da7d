use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::error;

use duffel::backup::BackupRunner;
use duffel::config::Config;

#[derive(Parser)]
#[command(
    name = "duffel",
    version,
    about = "Scheduled directory backups with compression, verification, and rotation",
    long_about = "Duffel compresses each configured source directory into a \
                  timestamped tar.gz archive, verifies archive integrity, records \
                  a JSON manifest alongside it, and retires old archives according \
                  to an age- and count-based retention policy. Configuration comes \
                  from environment variables (BACKUP_SOURCES, BACKUP_DESTINATION, \
                  RETENTION_DAYS, MIN_BACKUPS_TO_KEEP, LOG_LEVEL); the flags below \
                  override it for a single run.",
    after_help = "Examples:\n  duffel --dry-run\n  duffel --retention-days 14"
)]
struct Cli {
    /// Override backup sources (space-separated paths)
    #[arg(long, num_args = 1.., value_name = "PATH")]
    sources: Option<Vec<PathBuf>>,

    /// Override retention period in days
    #[arg(long, value_name = "DAYS")]
    retention_days: Option<u32>,

    /// Simulate the run without creating or deleting files
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env();

    // The logger comes up even when configuration failed to load, so the
    // failure itself is visible at the default level.
    let level = config
        .as_ref()
        .map(|c| c.level_filter())
        .unwrap_or(log::LevelFilter::Info);
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp_secs()
        .init();

    let mut config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration validation failed: {}", e);
            return Err(e.into());
        }
    };

    config.apply_overrides(cli.sources, cli.retention_days);

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        return Err(e.into());
    }

    let summary = BackupRunner::new(&config, cli.dry_run).run()?;

    if summary.failed > 0 {
        error!(
            "{} of {} source(s) failed to back up",
            summary.failed, summary.attempted
        );
    }

    Ok(())
}
