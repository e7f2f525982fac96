// Copyright (c) 2025 Marc Rivero López
// Licensed under GPLv3. See LICENSE file for details.

//! Commands Module Integration Tests
//!
//! Tests routing, argument validation and the configuration commands using real
//! Args structures and files on disk.

use certwatch::commands::{
    CheckCommand, Command, CommandRouter, ConfigExampleCommand, TestMailCommand,
};
use certwatch::{Args, RunConfiguration, WatchError};
use clap::Parser;

fn parse(argv: &[&str]) -> Args {
    let mut full = vec!["certwatch"];
    full.extend_from_slice(argv);
    Args::parse_from(full)
}

// ============================================================================
// Command Creation and Naming Tests
// ============================================================================

#[test]
fn test_command_names() {
    assert_eq!(CheckCommand::new(parse(&[])).name(), "CheckCommand");
    assert_eq!(
        ConfigExampleCommand::new(parse(&["--config-example", "x.toml"])).name(),
        "ConfigExampleCommand"
    );
    assert_eq!(
        TestMailCommand::new(parse(&["--test-mail"])).name(),
        "TestMailCommand"
    );
}

// ============================================================================
// Router Tests
// ============================================================================

#[test]
fn test_router_priority() {
    let cmd = CommandRouter::route(parse(&["--config-example", "x.toml", "-v"])).unwrap();
    assert_eq!(cmd.name(), "ConfigExampleCommand");

    let cmd = CommandRouter::route(parse(&["--test-mail", "-c", "other.toml"])).unwrap();
    assert_eq!(cmd.name(), "TestMailCommand");

    let cmd = CommandRouter::route(parse(&["--dry-run", "--strict"])).unwrap();
    assert_eq!(cmd.name(), "CheckCommand");
}

#[test]
fn test_router_rejects_dry_run_with_test_mail() {
    let err = CommandRouter::route(parse(&["--test-mail", "--dry-run"]))
        .err()
        .unwrap();
    assert!(matches!(err, WatchError::ConfigError { .. }));
}

// ============================================================================
// Configuration Commands
// ============================================================================

#[tokio::test]
async fn test_config_example_round_trips_through_loader() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("example.toml");

    CommandRouter::route(parse(&["--config-example", path.to_str().unwrap()]))
        .unwrap()
        .execute()
        .await
        .unwrap();

    let config = RunConfiguration::from_file(&path).unwrap();
    assert_eq!(config.hosts.len(), 2);
    assert_eq!(config.concurrency, 4);
    assert_eq!(config.email.recipients(), vec!["ops@example.com"]);
}

#[tokio::test]
async fn test_check_rejects_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(
        &path,
        r#"{
            "threshold": -1,
            "hosts": [{"host": "a.example"}],
            "smtp": {"host": "smtp.example.com"},
            "email": {"fromAddr": "a@example.com", "toAddr": "b@example.com", "subject": "s"}
        }"#,
    )
    .unwrap();

    let err = CommandRouter::route(parse(&["-c", path.to_str().unwrap(), "--dry-run"]))
        .unwrap()
        .execute()
        .await
        .unwrap_err();
    assert!(matches!(err, WatchError::ConfigError { .. }));
}

#[tokio::test]
async fn test_check_with_no_hosts_succeeds_in_dry_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.toml");
    std::fs::write(
        &path,
        r#"
threshold = 30
hosts = []

[smtp]
host = "smtp.example.com"

[email]
from_addr = "certwatch@example.com"
to_addr = "ops@example.com"
subject = "Expiring"
"#,
    )
    .unwrap();

    let result = CommandRouter::route(parse(&["-c", path.to_str().unwrap(), "--dry-run", "--strict"]))
        .unwrap()
        .execute()
        .await;
    assert!(result.is_ok());
}
