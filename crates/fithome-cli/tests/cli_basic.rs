//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_fithome-cli"))
        .args(args)
        .env("FITHOME_DATA_DIR", data_dir)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_empty_day_progress() {
    let dir = tempfile::tempdir().unwrap();
    let json = run_json(dir.path(), &["progress", "day", "2024-01-01"]);
    assert_eq!(json["date"], "2024-01-01");
    assert_eq!(json["calories_consumed"], 0);
    assert_eq!(json["workout_completed"], false);
    assert_eq!(json["pull_ups_today"], 0);
}

#[test]
fn test_food_log_accumulates() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["food", "log", "shake-whey", "--at", "2024-01-01T12:00:00Z"]);
    let second = run_json(
        dir.path(),
        &["food", "custom", "--calories", "120", "--protein", "3.5", "--at", "2024-01-01T15:00:00Z"],
    );
    assert_eq!(second["progress"]["calories_consumed"], 320);

    let list = run_json(dir.path(), &["food", "list"]);
    assert_eq!(list.as_array().unwrap().len(), 2);
    assert_eq!(list[1]["food_item_id"], "custom");
}

#[test]
fn test_unknown_food_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["food", "log", "pizza"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown food item"));
}

#[test]
fn test_workout_twice_same_day() {
    let dir = tempfile::tempdir().unwrap();
    let first = run_json(dir.path(), &["workout", "complete", "--at", "2024-01-01T21:00:00Z"]);
    assert_eq!(first["streak"]["current_streak"], 1);
    assert_eq!(first["entry"]["total_duration"], 165);

    let second = run_json(dir.path(), &["workout", "complete", "--at", "2024-01-01T21:30:00Z"]);
    assert!(second["streak"].is_null());

    let status = run_json(dir.path(), &["streak", "status"]);
    assert_eq!(status["current_streak"], 1);
    assert_eq!(status["next_tier"]["days_to_go"], 6);
}

#[test]
fn test_partial_workout_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["workout", "complete", "--exercise", "prancha"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("routine incomplete"));
}

#[test]
fn test_pull_ups_count_up() {
    let dir = tempfile::tempdir().unwrap();
    for expected in 1..=3 {
        let json = run_json(dir.path(), &["workout", "pull-up", "--at", "2024-01-01T08:00:00Z"]);
        assert_eq!(json["pull_ups_today"], expected);
    }
}

#[test]
fn test_weight_log_and_current() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["weight", "log", "61.5", "--at", "2024-01-01T08:00:00Z"]);
    let current = run_json(dir.path(), &["weight", "current"]);
    assert_eq!(current["current_weight"], 61.5);

    let trend = run_json(dir.path(), &["weight", "trend", "--at", "2024-01-01T09:00:00Z"]);
    assert_eq!(trend["points"].as_array().unwrap().len(), 14);

    let (_, _, code) = run_cli(dir.path(), &["weight", "log", "--", "-3"]);
    assert_ne!(code, 0);
}

#[test]
fn test_freezes_run_out() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["streak", "freeze"]);
    let profile = run_json(dir.path(), &["streak", "freeze"]);
    assert_eq!(profile["streak_freezes_available"], 0);
    assert_eq!(profile["streak_freezes_used"], 2);

    let (_, stderr, code) = run_cli(dir.path(), &["streak", "freeze"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("no streak freezes"));
}

#[test]
fn test_profile_set_and_reminder_plan() {
    let dir = tempfile::tempdir().unwrap();
    let profile = run_json(
        dir.path(),
        &["profile", "set", "--shutdown-time", "19:15", "--posture-reminders", "false"],
    );
    assert_eq!(profile["shutdown_time"], "19:15");

    let plan = run_json(dir.path(), &["reminders", "plan"]);
    let slots = plan.as_array().unwrap();
    assert_eq!(slots.len(), 4);
    assert_eq!(slots[3]["time"], "19:15");

    let (_, _, code) = run_cli(dir.path(), &["profile", "set", "--calorie-goal", "0"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "trend.window_days"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "14");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "trend.window_days", "21"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "trend.window_days"]);
    assert_eq!(stdout.trim(), "21");

    let (_, _, code) = run_cli(dir.path(), &["config", "get", "no.such.key"]);
    assert_ne!(code, 0);
}

#[test]
fn test_utc_offset_moves_day_boundary() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["config", "set", "day.utc_offset_minutes", "-180"]);
    assert_eq!(code, 0);

    let logged = run_json(dir.path(), &["food", "log", "shot-mel", "--at", "2024-01-02T01:00:00Z"]);
    assert_eq!(logged["progress"]["date"], "2024-01-01");
}

#[test]
fn test_config_path_and_show() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "path"]);
    assert_eq!(code, 0);
    assert_eq!(Path::new(stdout.trim()), dir.path().join("config.toml"));

    run_cli(dir.path(), &["config", "set", "advisories.calorie_remaining_threshold", "300"]);
    let (stdout, _, code) = run_cli(dir.path(), &["config", "show"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("[advisories]"));
    assert!(stdout.contains("calorie_remaining_threshold = 300"));
}

#[test]
fn test_unreadable_config_is_not_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let bytes = b"[trend]\nwindow_days = 30\n# caf\xE9\n";
    std::fs::write(&path, bytes).unwrap();

    let (_, _, code) = run_cli(dir.path(), &["config", "get", "trend.window_days"]);
    assert_ne!(code, 0);
    // commands that fall back to defaults still leave the file alone
    run_json(dir.path(), &["progress", "day", "2024-01-01"]);
    assert_eq!(std::fs::read(&path).unwrap(), bytes);
}
