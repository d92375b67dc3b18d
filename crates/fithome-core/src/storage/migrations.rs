//! Database schema migrations for fithome.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{params, Connection, Result as SqliteResult};
use serde::Deserialize;
use std::collections::HashMap;

use crate::day::DayKey;

/// Current schema version.
///
/// Increment this when adding new migrations.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// kv key under which older installs kept every day's progress as one JSON map.
const LEGACY_PROGRESS_KEY: &str = "daily_progress";

/// One day of the legacy blob, as the mobile app wrote it.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LegacyDay {
    calories_consumed: f64,
    protein_consumed: f64,
    workout_completed: bool,
    pull_ups_today: f64,
}

/// Non-negative whole count from a JS number.
fn legacy_count(value: f64) -> u32 {
    // float-to-int casts saturate and map NaN to 0
    value.round().max(0.0) as u32
}

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Migration v1: event logs, per-day progress and the kv table.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS food_logs (
            seq          INTEGER PRIMARY KEY AUTOINCREMENT,
            id           TEXT NOT NULL UNIQUE,
            food_item_id TEXT NOT NULL,
            timestamp    TEXT NOT NULL,
            calories     INTEGER NOT NULL,
            protein      REAL NOT NULL
        );

        CREATE TABLE IF NOT EXISTS weight_entries (
            seq       INTEGER PRIMARY KEY AUTOINCREMENT,
            id        TEXT NOT NULL UNIQUE,
            weight    REAL NOT NULL,
            date      TEXT NOT NULL,
            timestamp TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS workout_logs (
            seq            INTEGER PRIMARY KEY AUTOINCREMENT,
            id             TEXT NOT NULL UNIQUE,
            date           TEXT NOT NULL,
            timestamp      TEXT NOT NULL,
            exercises      TEXT NOT NULL DEFAULT '[]',
            total_duration INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS daily_progress (
            date              TEXT PRIMARY KEY,
            calories_consumed INTEGER NOT NULL DEFAULT 0,
            protein_consumed  REAL NOT NULL DEFAULT 0,
            workout_completed INTEGER NOT NULL DEFAULT 0,
            pull_ups_today    INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS kv (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_weight_entries_date ON weight_entries(date);
        CREATE INDEX IF NOT EXISTS idx_workout_logs_date ON workout_logs(date);",
    )?;

    set_schema_version(&tx, 1)?;
    tx.commit()?;
    Ok(())
}

/// Migration v2: split the legacy whole-map progress blob into per-day rows.
///
/// Days already present as rows are left alone. An unreadable blob is
/// dropped with a warning; it held derived totals only.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    let legacy: Option<String> = tx
        .query_row(
            "SELECT value FROM kv WHERE key = ?1",
            params![LEGACY_PROGRESS_KEY],
            |row| row.get(0),
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other),
        })?;

    if let Some(blob) = legacy {
        match serde_json::from_str::<HashMap<String, serde_json::Value>>(&blob) {
            Ok(map) => {
                let mut imported = 0usize;
                for (key, value) in map {
                    let day = match key.parse::<DayKey>() {
                        Ok(day) => day,
                        Err(e) => {
                            tracing::warn!(key = %key, error = %e, "skipping legacy progress day");
                            continue;
                        }
                    };
                    let legacy = match serde_json::from_value::<LegacyDay>(value) {
                        Ok(legacy) => legacy,
                        Err(e) => {
                            tracing::warn!(day = %day, error = %e, "skipping unreadable legacy progress day");
                            continue;
                        }
                    };
                    let protein = if legacy.protein_consumed.is_finite() {
                        legacy.protein_consumed.max(0.0)
                    } else {
                        0.0
                    };
                    imported += tx.execute(
                        "INSERT OR IGNORE INTO daily_progress
                            (date, calories_consumed, protein_consumed, workout_completed, pull_ups_today)
                         VALUES (?1, ?2, ?3, ?4, ?5)",
                        params![
                            day.to_string(),
                            legacy_count(legacy.calories_consumed),
                            protein,
                            legacy.workout_completed,
                            legacy_count(legacy.pull_ups_today),
                        ],
                    )?;
                }
                tracing::info!(days = imported, "imported legacy daily progress");
            }
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable legacy daily progress blob");
            }
        }
        tx.execute("DELETE FROM kv WHERE key = ?1", params![LEGACY_PROGRESS_KEY])?;
    }

    set_schema_version(&tx, 2)?;
    tx.commit()?;
    Ok(())
}
