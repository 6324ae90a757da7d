//! End-to-end tests for the duffel binary
//!
//! Each invocation gets its own temporary source and destination plus a full
//! set of configuration variables, so tests never read the developer's real
//! environment.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CONFIG_VARS: [&str; 5] = [
    "BACKUP_SOURCES",
    "BACKUP_DESTINATION",
    "RETENTION_DAYS",
    "MIN_BACKUPS_TO_KEEP",
    "LOG_LEVEL",
];

fn duffel() -> Command {
    let mut cmd = Command::cargo_bin("duffel").unwrap();
    for var in CONFIG_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("RUST_LOG");
    cmd
}

fn configured(source: &Path, destination: &Path) -> Command {
    let mut cmd = duffel();
    cmd.env("BACKUP_SOURCES", source.as_os_str())
        .env("BACKUP_DESTINATION", destination.as_os_str())
        .env("RETENTION_DAYS", "7")
        .env("MIN_BACKUPS_TO_KEEP", "2")
        .env("LOG_LEVEL", "info");
    cmd
}

fn make_source(temp_dir: &TempDir) -> std::path::PathBuf {
    let source = temp_dir.path().join("docs");
    fs::create_dir(&source).unwrap();
    fs::write(source.join("notes.txt"), "hello").unwrap();
    source
}

#[test]
fn missing_configuration_exits_nonzero() {
    duffel()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing required environment variables"));
}

#[test]
fn missing_source_exits_nonzero() {
    let temp_dir = TempDir::new().unwrap();

    configured(
        &temp_dir.path().join("never-existed"),
        &temp_dir.path().join("backups"),
    )
    .assert()
    .failure()
    .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn dry_run_leaves_destination_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let source = make_source(&temp_dir);
    let destination = temp_dir.path().join("backups");

    configured(&source, &destination)
        .arg("--dry-run")
        .assert()
        .success()
        .stderr(predicate::str::contains("[DRY-RUN] Would compress"))
        .stderr(predicate::str::contains("Would create: 1 backup(s)"));

    // Validation creates the destination; nothing else may appear in it
    assert_eq!(fs::read_dir(&destination).unwrap().count(), 0);
}

#[test]
fn run_creates_archive_and_manifest() {
    let temp_dir = TempDir::new().unwrap();
    let source = make_source(&temp_dir);
    let destination = temp_dir.path().join("backups");

    configured(&source, &destination)
        .assert()
        .success()
        .stderr(predicate::str::contains("Backup created"))
        .stderr(predicate::str::contains("Successful: 1"));

    let mut names: Vec<String> = fs::read_dir(&destination)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    assert_eq!(names.len(), 2);
    assert!(names[0].starts_with("docs_") && names[0].ends_with(".json"));
    assert!(names[1].starts_with("docs_") && names[1].ends_with(".tar.gz"));
}

#[test]
fn source_override_replaces_configured_sources() {
    let temp_dir = TempDir::new().unwrap();
    let ignored = make_source(&temp_dir);
    let override_source = temp_dir.path().join("extra");
    fs::create_dir(&override_source).unwrap();
    fs::write(override_source.join("data.bin"), "payload").unwrap();
    let destination = temp_dir.path().join("backups");

    configured(&ignored, &destination)
        .args(["--sources"])
        .arg(&override_source)
        .assert()
        .success();

    let names: Vec<String> = fs::read_dir(&destination)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();

    assert!(names.iter().all(|n| n.starts_with("extra_")));
    assert!(names.iter().any(|n| n.ends_with(".tar.gz")));
}
