//! End-to-end integration tests for leadtrack-cli
//!
//! These spawn the built binary against temporary XDG directories and are
//! gated behind the `integration` feature flag. Run with:
//!
//! ```sh
//! cargo test -p leadtrack-cli --features integration
//! ```

#![cfg(feature = "integration")]

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn leadtrack(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_leadtrack"))
        .args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("LEADTRACK_PROJECT_CONFIG_DIR", home.join("project"))
        .env("LEADTRACK_MEASUREMENT_ID", "G-E2E")
        .output()
        .expect("Failed to run leadtrack")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Test that leadtrack --help lists the commands
#[test]
fn leadtrack_help_works() {
    let home = TempDir::new().unwrap();
    let output = leadtrack(home.path(), &["--help"]);

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("visit"));
    assert!(stdout.contains("track"));
    assert!(stdout.contains("attribution"));
}

/// Test that leadtrack config path shows paths
#[test]
fn leadtrack_config_path_shows_paths() {
    let home = TempDir::new().unwrap();
    let output = leadtrack(home.path(), &["config", "path"]);

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("User config:"));
    assert!(stdout.contains("Project config:"));
    assert!(stdout.contains("events.jsonl"));
}

/// Test that the environment measurement id shows up in config show
#[test]
fn leadtrack_config_show_includes_env_measurement_id() {
    let home = TempDir::new().unwrap();
    let output = leadtrack(home.path(), &["config", "show"]);

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("[tracking]"));
    assert!(stdout.contains("G-E2E"));
}

/// Campaign visit, second visit, then a CTA click keeps first touch
#[test]
fn leadtrack_campaign_funnel_keeps_first_touch() {
    let home = TempDir::new().unwrap();

    let first = leadtrack(
        home.path(),
        &["visit", "https://x.test/?utm_source=linkedin&utm_medium=social"],
    );
    assert!(first.status.success());

    let second = leadtrack(home.path(), &["visit", "https://x.test/?utm_source=google"]);
    assert!(second.status.success());

    let click = leadtrack(home.path(), &["track", "cta-click"]);
    assert!(click.status.success());

    let attribution = stdout(&leadtrack(home.path(), &["attribution"]));
    assert!(attribution.contains("linkedin"));
    assert!(!attribution.contains("google"));

    let events = stdout(&leadtrack(home.path(), &["events", "--json"]));
    let names: Vec<&str> = events
        .lines()
        .filter_map(|line| line.split("\"name\":\"").nth(1))
        .filter_map(|rest| rest.split('"').next())
        .collect();
    assert_eq!(
        names,
        vec![
            "campaign_landing",
            "page_view",
            "campaign_landing",
            "page_view",
            "cta_click"
        ]
    );
}

/// Test that track before any visit fails with a hint
#[test]
fn leadtrack_track_without_visit_fails() {
    let home = TempDir::new().unwrap();
    let output = leadtrack(home.path(), &["track", "form-start"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("leadtrack visit"));
}

/// Test that --dry-run prints events and leaves no log behind
#[test]
fn leadtrack_dry_run_prints_events() {
    let home = TempDir::new().unwrap();
    let output = leadtrack(home.path(), &["--dry-run", "visit", "https://x.test/"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("\"name\":\"page_view\""));
    assert!(!home.path().join("data/leadtrack/events.jsonl").exists());
}
