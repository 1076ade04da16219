//! Integration test for reports over the local directory backend

use crate::fixtures::{ALEX, STEVE, create_server_fixture, stats_json, write_file_sync};
use playtime::models::{DirectoryEntry, RemoteFileHandle};
use playtime::services::remote::local::LocalFiles;
use playtime::{
    AggregateOptions, BackendKind, Error, FailurePolicy, RemoteFiles, ReportOptions,
};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_report_via_local_backend() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_server_fixture(temp_dir.path()).unwrap();
    let files = LocalFiles::new(&root).unwrap();
    assert_eq!(files.kind(), BackendKind::Local);

    let report =
        playtime::generate_playtime_report(&files, "local", &ReportOptions::default()).unwrap();

    assert_eq!(report.server_id, "local");
    assert!(report.issues.is_empty());
    assert_eq!(report.lines.len(), 2);

    let steve = report.lines.iter().find(|l| l.uuid == STEVE).unwrap();
    assert_eq!(steve.name, "Steve");
    assert_eq!(steve.total_playtime_ticks, 54_000);

    let alex = report.lines.iter().find(|l| l.uuid == ALEX).unwrap();
    assert_eq!(alex.total_playtime_ticks, 1_200);
    assert!(report.finished_at >= report.started_at);
}

#[test]
fn test_listing_marks_directories() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_server_fixture(temp_dir.path()).unwrap();
    let files = LocalFiles::new(&root).unwrap();

    let entries = files
        .list_children(&RemoteFileHandle::new("local", "world/stats"))
        .unwrap();

    assert!(entries.contains(&DirectoryEntry::directory("backup.json")));
    assert!(entries.contains(&DirectoryEntry::file("notes.txt")));
    assert_eq!(entries.len(), 4);
}

#[test]
fn test_listing_a_file_is_not_a_directory() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_server_fixture(temp_dir.path()).unwrap();
    let files = LocalFiles::new(&root).unwrap();

    let result = files.list_children(&RemoteFileHandle::new("local", "usercache.json"));
    assert!(matches!(result, Err(Error::NotADirectory { .. })));
}

#[test]
fn test_missing_file_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let files = LocalFiles::new(temp_dir.path()).unwrap();

    let result = files.fetch_bytes(&RemoteFileHandle::new("local", "usercache.json"));
    assert!(matches!(result, Err(Error::NotFound { path }) if path == "usercache.json"));
}

#[test]
fn test_paths_cannot_escape_root() {
    let temp_dir = TempDir::new().unwrap();
    let files = LocalFiles::new(temp_dir.path()).unwrap();

    let result = files.fetch_bytes(&RemoteFileHandle::new("local", "../etc/passwd"));
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[test]
fn test_orphaned_stats_are_reported_per_player() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_server_fixture(temp_dir.path()).unwrap();
    write_file_sync(
        root.join("world/stats/xyz999.json"),
        stats_json(42).as_bytes(),
    )
    .unwrap();
    let files = LocalFiles::new(&root).unwrap();

    let report =
        playtime::generate_playtime_report(&files, "local", &ReportOptions::default()).unwrap();

    assert_eq!(report.lines.len(), 2);
    assert_eq!(report.issues.len(), 1);
    assert!(matches!(
        &report.issues[0].error,
        Error::UnresolvedPlayer { uuid } if uuid == "xyz999"
    ));
}

#[test]
fn test_best_effort_and_fan_out_together() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_server_fixture(temp_dir.path()).unwrap();
    write_file_sync(root.join("world/stats/broken.json"), b"{\"stats\":").unwrap();
    let files = LocalFiles::new(&root).unwrap();

    let opts = ReportOptions {
        aggregate: AggregateOptions {
            jobs: 4,
            policy: FailurePolicy::BestEffort,
            ..AggregateOptions::default()
        },
        ..ReportOptions::default()
    };
    let report = playtime::generate_playtime_report(&files, "local", &opts).unwrap();

    assert_eq!(report.lines.len(), 2);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].uuid, "broken");

    let strict = playtime::generate_playtime_report(&files, "local", &ReportOptions::default());
    assert!(matches!(strict, Err(Error::MalformedDocument { .. })));
}

#[test]
fn test_missing_usercache_aborts() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_server_fixture(temp_dir.path()).unwrap();
    fs::remove_file(root.join("usercache.json")).unwrap();
    let files = LocalFiles::new(&root).unwrap();

    let result = playtime::generate_playtime_report(&files, "local", &ReportOptions::default());
    assert!(matches!(result, Err(Error::NotFound { path }) if path == "usercache.json"));
}

#[test]
fn test_root_must_be_directory() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("plain.txt");
    write_file_sync(&file, b"x").unwrap();

    assert!(matches!(LocalFiles::new(&file), Err(Error::InvalidInput(_))));
    assert!(matches!(
        LocalFiles::new(temp_dir.path().join("absent")),
        Err(Error::InvalidInput(_))
    ));
}
