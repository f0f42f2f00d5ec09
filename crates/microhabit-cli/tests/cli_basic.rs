//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_microhabit"))
        .env("MICROHABIT_HOME", home)
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(home: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "command {args:?} failed: {stderr}");
    stdout
}

fn habit_ids(home: &Path) -> Vec<String> {
    let out = run_ok(home, &["habit", "list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_habit_add_and_list() {
    let home = tempfile::tempdir().unwrap();
    let out = run_ok(home.path(), &["habit", "add", "Drink water", "--emoji", "💧"]);
    assert!(out.contains("Habit created:"));

    let list = run_ok(home.path(), &["habit", "list"]);
    assert!(list.contains("Drink water"));
    assert_eq!(habit_ids(home.path()).len(), 1);
}

#[test]
fn test_streak_across_days() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["habit", "add", "Read"]);

    for day in ["2024-01-01", "2024-01-02", "2024-01-03"] {
        run_ok(home.path(), &["--today", day, "done", "read"]);
    }
    let out = run_ok(home.path(), &["--today", "2024-01-03", "today", "--json"]);
    let rows: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(rows[0]["streak"], 3);
    assert_eq!(rows[0]["completed"], true);

    let out = run_ok(home.path(), &["--today", "2024-01-05", "done", "Read"]);
    assert!(out.contains("Streak: 1"));
    let out = run_ok(home.path(), &["--today", "2024-01-05", "undo", "Read"]);
    assert!(out.contains("Streak: 0"));
}

#[test]
fn test_done_unknown_habit_fails() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["done", "nope"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_invalid_name_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["habit", "add", "x"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Habit name"));
}

#[test]
fn test_export_import_round_trip() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["habit", "add", "Walk"]);
    run_ok(home.path(), &["--today", "2024-02-01", "done", "Walk"]);
    let backup = home.path().join("backup.json");
    run_ok(
        home.path(),
        &["data", "export", "--output", backup.to_str().unwrap()],
    );

    let other = tempfile::tempdir().unwrap();
    let out = run_ok(other.path(), &["data", "import", backup.to_str().unwrap()]);
    assert!(out.contains("imported 1 habits"));
    assert_eq!(habit_ids(other.path()), habit_ids(home.path()));
}

#[test]
fn test_import_rejects_malformed_file() {
    let home = tempfile::tempdir().unwrap();
    let bad = home.path().join("bad.json");
    std::fs::write(&bad, "[1, 2, 3]").unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["data", "import", bad.to_str().unwrap()]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Invalid snapshot format"));
}

#[test]
fn test_config_get_set() {
    let home = tempfile::tempdir().unwrap();
    assert_eq!(run_ok(home.path(), &["config", "get", "theme"]).trim(), "default");
    run_ok(home.path(), &["config", "set", "theme", "dark"]);
    assert_eq!(run_ok(home.path(), &["config", "get", "theme"]).trim(), "dark");

    let (_, _, code) = run_cli(home.path(), &["config", "set", "limits.bogus", "1"]);
    assert_ne!(code, 0);

    let (_, _, code) = run_cli(
        home.path(),
        &["config", "set", "notifications.reminder_time", "99:99"],
    );
    assert_ne!(code, 0);
    assert_eq!(
        run_ok(home.path(), &["config", "get", "notifications.reminder_time"]).trim(),
        "09:00"
    );
}

#[test]
fn test_remind_prints_daily_reminder() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["habit", "add", "Read"]);

    let out = run_ok(home.path(), &["remind", "--force"]);
    assert!(out.contains("sent 0 notification(s)"));

    run_ok(home.path(), &["config", "set", "notifications.enabled", "true"]);
    let out = run_ok(home.path(), &["remind", "--force"]);
    assert!(out.contains("Don't forget: Read"));
    assert!(out.contains("sent 1 notification(s)"));
}

#[test]
fn test_insight_and_suggestions_fall_back() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["habit", "add", "Read"]);
    let out = run_ok(home.path(), &["insight"]);
    assert!(out.contains("Your dedication this week is inspiring!"));

    let out = run_ok(home.path(), &["suggest"]);
    assert!(out.contains("Drink water"));
    assert!(!out.lines().any(|l| l == "Read"));
}

#[test]
fn test_stats_and_calendar() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["habit", "add", "Stretch"]);
    run_ok(home.path(), &["--today", "2024-02-10", "done", "Stretch"]);

    let week = run_ok(home.path(), &["--today", "2024-02-10", "stats", "week"]);
    let rows: serde_json::Value = serde_json::from_str(&week).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 7);
    assert_eq!(rows[6]["completed"], 1);

    let cal = run_ok(
        home.path(),
        &["--today", "2024-02-10", "calendar", "--year", "2024", "--month", "2"],
    );
    assert!(cal.starts_with("2024-02"));
    assert!(cal.contains("10*"));
}

#[test]
fn test_clear_requires_confirmation() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["habit", "add", "Read"]);
    let (_, _, code) = run_cli(home.path(), &["data", "clear"]);
    assert_ne!(code, 0);
    run_ok(home.path(), &["data", "clear", "--yes"]);
    assert!(habit_ids(home.path()).is_empty());
}
