//! Retention planning
//!
//! Decides which archives to retire based on two rules that always hold:
//! an archive younger than the retention window is never deleted, and the
//! most recent `min_backups` archives are kept regardless of age. Planning
//! is pure — the caller supplies the clock and performs deletions.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::RetentionPolicy;
use crate::error::{DuffelError, DuffelResult};

use super::ARCHIVE_SUFFIX;

/// Parse the `YYYYMMDD_HHMMSS` timestamp out of an archive filename
///
/// The two underscore-delimited fixed-width tokens immediately before the
/// `.tar.gz` suffix carry the archive's identity. Names that do not match
/// yield `None` and are excluded from rotation entirely, so a stray file in
/// the destination is never auto-deleted.
pub fn parse_archive_timestamp(filename: &str) -> Option<NaiveDateTime> {
    let stem = filename.strip_suffix(ARCHIVE_SUFFIX)?;

    let mut tokens = stem.rsplitn(3, '_');
    let time_part = tokens.next()?;
    let date_part = tokens.next()?;

    if date_part.len() != 8 || time_part.len() != 6 {
        return None;
    }

    let year: i32 = date_part[0..4].parse().ok()?;
    let month: u32 = date_part[4..6].parse().ok()?;
    let day: u32 = date_part[6..8].parse().ok()?;
    let hour: u32 = time_part[0..2].parse().ok()?;
    let minute: u32 = time_part[2..4].parse().ok()?;
    let second: u32 = time_part[4..6].parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, second)?;
    Some(NaiveDateTime::new(date, time))
}

/// List every archive in the destination directory
///
/// Rotation considers the full directory contents, not just archives created
/// by the current run.
pub fn list_archives(destination: &Path) -> DuffelResult<Vec<PathBuf>> {
    let mut archives = Vec::new();

    let entries = fs::read_dir(destination).map_err(|e| {
        DuffelError::Io(format!(
            "Failed to read backup destination {}: {}",
            destination.display(),
            e
        ))
    })?;

    for entry in entries {
        let entry =
            entry.map_err(|e| DuffelError::Io(format!("Failed to read directory entry: {}", e)))?;
        let path = entry.path();
        if path
            .file_name()
            .map_or(false, |n| n.to_string_lossy().ends_with(ARCHIVE_SUFFIX))
        {
            archives.push(path);
        }
    }

    Ok(archives)
}

/// Plan which archives to delete under a retention policy
///
/// Parseable archives are sorted oldest first and walked until the number of
/// archives left standing reaches the `min_backups` floor; before that point
/// an archive is marked for deletion only when its timestamp is strictly
/// older than `now - retention_days`. The returned list is ordered oldest
/// first.
///
/// The floor is global across the destination directory: when several
/// sources share one destination they also share the `min_backups` floor.
pub fn plan_rotation(
    archives: &[PathBuf],
    policy: RetentionPolicy,
    now: NaiveDateTime,
) -> Vec<PathBuf> {
    let mut dated: Vec<(NaiveDateTime, PathBuf)> = archives
        .iter()
        .filter_map(|path| {
            let name = path.file_name()?.to_string_lossy();
            let timestamp = parse_archive_timestamp(&name)?;
            Some((timestamp, path.clone()))
        })
        .collect();
    dated.sort_by_key(|(timestamp, _)| *timestamp);

    let cutoff = now - Duration::days(i64::from(policy.retention_days));
    let mut remaining = dated.len();
    let mut to_delete = Vec::new();

    for (timestamp, path) in dated {
        if remaining <= policy.min_backups {
            break;
        }
        if timestamp < cutoff {
            to_delete.push(path);
            remaining -= 1;
        }
    }

    to_delete
}
