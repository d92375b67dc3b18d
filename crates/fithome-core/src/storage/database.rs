//! SQLite-backed record store.
//!
//! Provides persistent storage for:
//! - Append-only food, weight and workout logs
//! - One progress row per calendar day
//! - The user profile, kept as a JSON blob in the key-value table
//!
//! Reads are forgiving: a row or blob that no longer decodes is logged and
//! skipped (or replaced by its default) instead of failing the whole read.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use uuid::Uuid;

use super::{data_dir, migrations};
use crate::day::DayKey;
use crate::error::{Result, StorageError};
use crate::profile::UserProfile;
use crate::progress::DailyProgress;
use crate::records::{FoodLogEntry, WeightEntry, WorkoutLogEntry};

const USER_STATS_KEY: &str = "user_stats";

/// SQLite database holding every persisted record.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/fithome/fithome.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("fithome.db");
        Self::open_at(&path)
    }

    /// Open (or create) the database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        tracing::debug!(path = %path.display(), "opened database");
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        migrations::migrate(&self.conn)
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    /// Run `f` inside one SQLite transaction.
    ///
    /// Commits when `f` succeeds and rolls back when it fails.
    pub fn transaction<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(self)?;
        tx.commit()
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        Ok(value)
    }

    // ── Food ────────────────────────────────────────────────────────────

    pub fn append_food_log(&self, entry: &FoodLogEntry) -> Result<()> {
        self.conn.execute(
            "INSERT INTO food_logs (id, food_item_id, timestamp, calories, protein)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.id.to_string(),
                entry.food_item_id,
                entry.timestamp.to_rfc3339(),
                entry.calories,
                entry.protein,
            ],
        )?;
        Ok(())
    }

    /// Every food log, oldest first.
    pub fn food_logs(&self) -> Result<Vec<FoodLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, food_item_id, timestamp, calories, protein
             FROM food_logs ORDER BY seq",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, u32>(3)?,
                row.get::<_, f64>(4)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (id, food_item_id, timestamp, calories, protein) = row?;
            match (parse_id(&id), parse_timestamp(&timestamp)) {
                (Some(id), Some(timestamp)) => out.push(FoodLogEntry {
                    id,
                    food_item_id,
                    timestamp,
                    calories,
                    protein,
                }),
                _ => tracing::warn!(id = %id, "skipping unreadable food log row"),
            }
        }
        Ok(out)
    }

    // ── Weight ──────────────────────────────────────────────────────────

    pub fn append_weight_entry(&self, entry: &WeightEntry) -> Result<()> {
        self.conn.execute(
            "INSERT INTO weight_entries (id, weight, date, timestamp)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.id.to_string(),
                entry.weight,
                entry.date.to_string(),
                entry.timestamp.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Every weight entry, oldest first.
    pub fn weight_entries(&self) -> Result<Vec<WeightEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, weight, date, timestamp FROM weight_entries ORDER BY seq",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (id, weight, date, timestamp) = row?;
            match (
                parse_id(&id),
                date.parse::<DayKey>().ok(),
                parse_timestamp(&timestamp),
            ) {
                (Some(id), Some(date), Some(timestamp)) => out.push(WeightEntry {
                    id,
                    weight,
                    date,
                    timestamp,
                }),
                _ => tracing::warn!(id = %id, "skipping unreadable weight entry row"),
            }
        }
        Ok(out)
    }

    /// The most recently recorded weight entry by timestamp.
    pub fn latest_weight_entry(&self) -> Result<Option<WeightEntry>> {
        Ok(self
            .weight_entries()?
            .into_iter()
            .max_by_key(|e| e.timestamp))
    }

    // ── Workouts ────────────────────────────────────────────────────────

    pub fn append_workout_log(&self, entry: &WorkoutLogEntry) -> Result<()> {
        let exercises = serde_json::to_string(&entry.exercises_completed)?;
        self.conn.execute(
            "INSERT INTO workout_logs (id, date, timestamp, exercises, total_duration)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.id.to_string(),
                entry.date.to_string(),
                entry.timestamp.to_rfc3339(),
                exercises,
                entry.total_duration,
            ],
        )?;
        Ok(())
    }

    /// Every workout log, oldest first.
    pub fn workout_logs(&self) -> Result<Vec<WorkoutLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, timestamp, exercises, total_duration
             FROM workout_logs ORDER BY seq",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, u32>(4)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (id, date, timestamp, exercises, total_duration) = row?;
            let decoded = (
                parse_id(&id),
                date.parse::<DayKey>().ok(),
                parse_timestamp(&timestamp),
            );
            let (Some(uuid), Some(date), Some(timestamp)) = decoded else {
                tracing::warn!(id = %id, "skipping unreadable workout log row");
                continue;
            };
            let exercises_completed = serde_json::from_str(&exercises).unwrap_or_else(|e| {
                tracing::warn!(id = %id, error = %e, "unreadable exercise list");
                Vec::new()
            });
            out.push(WorkoutLogEntry {
                id: uuid,
                date,
                timestamp,
                exercises_completed,
                total_duration,
            });
        }
        Ok(out)
    }

    /// Latest day with a logged workout.
    pub fn last_workout_day(&self) -> Result<Option<DayKey>> {
        let day: Option<String> = self
            .conn
            .query_row("SELECT MAX(date) FROM workout_logs", [], |row| row.get(0))?;
        Ok(day.and_then(|d| d.parse().ok()))
    }

    // ── Daily progress ──────────────────────────────────────────────────

    /// Progress for `day`, or a zero-valued record if the day has none.
    pub fn load_progress(&self, day: DayKey) -> Result<DailyProgress> {
        let row = self
            .conn
            .query_row(
                "SELECT calories_consumed, protein_consumed, workout_completed, pull_ups_today
                 FROM daily_progress WHERE date = ?1",
                params![day.to_string()],
                |row| {
                    Ok(DailyProgress {
                        date: day,
                        calories_consumed: row.get(0)?,
                        protein_consumed: row.get(1)?,
                        workout_completed: row.get(2)?,
                        pull_ups_today: row.get(3)?,
                    })
                },
            )
            .optional();

        match row {
            Ok(found) => Ok(found.unwrap_or_else(|| DailyProgress::empty(day))),
            Err(e @ rusqlite::Error::FromSqlConversionFailure(..))
            | Err(e @ rusqlite::Error::InvalidColumnType(..))
            | Err(e @ rusqlite::Error::IntegralValueOutOfRange(..)) => {
                tracing::warn!(day = %day, error = %e, "unreadable progress row, using zero values");
                Ok(DailyProgress::empty(day))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Insert or overwrite the row for `progress.date`.
    pub fn save_progress(&self, progress: &DailyProgress) -> Result<()> {
        self.conn.execute(
            "INSERT INTO daily_progress
                (date, calories_consumed, protein_consumed, workout_completed, pull_ups_today)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(date) DO UPDATE SET
                calories_consumed = excluded.calories_consumed,
                protein_consumed  = excluded.protein_consumed,
                workout_completed = excluded.workout_completed,
                pull_ups_today    = excluded.pull_ups_today",
            params![
                progress.date.to_string(),
                progress.calories_consumed,
                progress.protein_consumed,
                progress.workout_completed,
                progress.pull_ups_today,
            ],
        )?;
        Ok(())
    }

    /// Stored progress rows between `from` and `to` inclusive, oldest first.
    ///
    /// Days without events are absent.
    pub fn progress_history(&self, from: DayKey, to: DayKey) -> Result<Vec<DailyProgress>> {
        let mut stmt = self.conn.prepare(
            "SELECT date, calories_consumed, protein_consumed, workout_completed, pull_ups_today
             FROM daily_progress WHERE date >= ?1 AND date <= ?2 ORDER BY date",
        )?;
        let rows = stmt.query_map(params![from.to_string(), to.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, bool>(3)?,
                row.get::<_, u32>(4)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (date, calories_consumed, protein_consumed, workout_completed, pull_ups_today) =
                row?;
            match date.parse::<DayKey>() {
                Ok(date) => out.push(DailyProgress {
                    date,
                    calories_consumed,
                    protein_consumed,
                    workout_completed,
                    pull_ups_today,
                }),
                Err(e) => tracing::warn!(error = %e, "skipping progress row with bad date"),
            }
        }
        Ok(out)
    }

    // ── Profile ─────────────────────────────────────────────────────────

    /// The stored profile merged over the defaults.
    ///
    /// A missing or corrupt blob yields the default profile.
    pub fn load_profile(&self) -> Result<UserProfile> {
        let Some(blob) = self.kv_get(USER_STATS_KEY)? else {
            return Ok(UserProfile::default());
        };
        Ok(serde_json::from_str(&blob).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "unreadable user profile, using defaults");
            UserProfile::default()
        }))
    }

    pub fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        let blob = serde_json::to_string(profile)?;
        self.kv_set(USER_STATS_KEY, &blob)?;
        Ok(())
    }

    // ── Key-value ───────────────────────────────────────────────────────

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}
