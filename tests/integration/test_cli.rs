//! End-to-end tests for the playtime binary

use crate::fixtures::{STEVE, create_server_fixture, stats_json, write_file_sync};
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_playtime"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run playtime binary")
}

#[test]
fn test_help_lists_commands() {
    let output = run(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("playtime report"));
    assert!(stdout.contains("playtime servers"));
    assert!(stdout.contains("--best-effort"));
}

#[test]
fn test_local_report_as_json() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_server_fixture(temp_dir.path()).unwrap();

    let output = run(&[
        "report",
        "--local",
        root.to_str().unwrap(),
        "--sort",
        "playtime",
        "--json",
        "--quiet",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["server_id"], "local");
    assert_eq!(json["player_count"], 2);
    assert_eq!(json["players"][0]["uuid"], STEVE);
    assert_eq!(json["players"][0]["total_playtime_ticks"], 54_000);
    assert!(json["issues"].is_null());
}

#[test]
fn test_local_report_as_text() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_server_fixture(temp_dir.path()).unwrap();

    let output = run(&["report", "--local", root.to_str().unwrap(), "--sort", "name", "--top", "1"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Player: Alex"));
    assert!(!stdout.contains("Player: Steve"));
    assert!(stdout.contains("total server playtime (ticks): 1200 (~1m 00s)"));
}

#[test]
fn test_orphaned_stats_exit_with_partial_failure() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_server_fixture(temp_dir.path()).unwrap();
    write_file_sync(root.join("world/stats/xyz999.json"), stats_json(1).as_bytes()).unwrap();
    let root = root.to_str().unwrap();

    let output = run(&["report", "--local", root, "--quiet"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Player: Steve"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("xyz999"));

    let strict = run(&["report", "--local", root, "--strict", "--quiet"]);
    assert_eq!(strict.status.code(), Some(3));
    assert!(strict.stdout.is_empty());
}

#[test]
fn test_invalid_input_exit_codes() {
    let temp_dir = TempDir::new().unwrap();
    let missing_config = temp_dir.path().join("config.json");

    let output = run(&["report", "--config", missing_config.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));

    let output = run(&["report", "--jobs", "0"]);
    assert_eq!(output.status.code(), Some(2));

    let root = create_server_fixture(temp_dir.path()).unwrap();
    let output = run(&["report", "--local", root.to_str().unwrap(), "--sort", "size"]);
    assert_eq!(output.status.code(), Some(2));
}
