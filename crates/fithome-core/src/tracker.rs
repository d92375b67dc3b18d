//! The tracker: every user intent as one serialized read-modify-write.
//!
//! [`Tracker`] owns the database behind a mutex. Each mutator takes the lock,
//! opens a transaction, reads the affected record, applies the pure update
//! from [`progress`](crate::progress) or [`streak`](crate::streak), writes the
//! result back and commits. Concurrent callers therefore never observe or
//! overwrite stale state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};

use crate::catalog::{FoodItem, Routine};
use crate::day::{DayBoundary, DayKey};
use crate::error::{Result, StorageError, ValidationError};
use crate::profile::{SettingsUpdate, UserProfile};
use crate::progress::DailyProgress;
use crate::records::{
    validate_protein, validate_weight, FoodLogEntry, WeightEntry, WorkoutLogEntry,
};
use crate::reminders::{self, Advisory, AdvisoryConfig, Notifier, ReminderSlot};
use crate::storage::{Config, Database, TrendConfig};
use crate::streak::{self, StreakAdvance, TierTable};
use crate::trend::WeightTrend;

/// Result of logging one food item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodLogged {
    pub entry: FoodLogEntry,
    pub progress: DailyProgress,
}

/// Result of finishing the workout routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutCompleted {
    pub entry: WorkoutLogEntry,
    pub progress: DailyProgress,
    /// `None` when the day was already complete and the streak stayed put.
    pub streak: Option<StreakAdvance>,
}

pub struct Tracker {
    db: Mutex<Database>,
    tiers: TierTable,
    boundary: DayBoundary,
    trend: TrendConfig,
    advisories: AdvisoryConfig,
    routine: Routine,
}

impl Tracker {
    pub fn new(db: Database, config: &Config) -> Self {
        Self {
            db: Mutex::new(db),
            tiers: config.tier_table(),
            boundary: config.day_boundary(),
            trend: config.trend.clone(),
            advisories: config.advisories.clone(),
            routine: Routine::default(),
        }
    }

    /// Open the on-disk database with the on-disk configuration.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened.
    pub fn open() -> Result<Self> {
        let config = Config::load_or_default();
        Ok(Self::new(Database::open()?, &config))
    }

    pub fn with_day_boundary(mut self, boundary: DayBoundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    pub fn routine(&self) -> &Routine {
        &self.routine
    }

    /// Calendar day `at` falls on.
    pub fn day_key(&self, at: DateTime<Utc>) -> DayKey {
        self.boundary.key(at)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Database>> {
        self.db.lock().map_err(|_| StorageError::Poisoned.into())
    }

    /// Run `f` under the store lock inside one transaction.
    fn write<T>(&self, f: impl FnOnce(&Database) -> Result<T>) -> Result<T> {
        let db = self.lock()?;
        db.transaction(f)
    }

    fn read<T>(&self, f: impl FnOnce(&Database) -> Result<T>) -> Result<T> {
        let db = self.lock()?;
        f(&db)
    }

    // ── Intents ─────────────────────────────────────────────────────────

    /// Append a food log and add its nutrition to that day's progress.
    ///
    /// # Errors
    /// Returns a validation error for negative or non-finite protein, or a
    /// storage error if the write fails.
    pub fn log_food(
        &self,
        food_item_id: &str,
        calories: u32,
        protein: f64,
        at: DateTime<Utc>,
    ) -> Result<FoodLogged> {
        let protein = validate_protein(protein)?;
        let entry = FoodLogEntry::new(food_item_id, calories, protein, at);
        let day = self.day_key(at);

        let progress = self.write(|db| {
            db.append_food_log(&entry)?;
            let mut progress = db.load_progress(day)?;
            progress.apply_nutrition(calories, protein);
            db.save_progress(&progress)?;
            Ok(progress)
        })?;

        tracing::debug!(
            day = %day,
            food = food_item_id,
            calories,
            total = progress.calories_consumed,
            "logged food"
        );
        Ok(FoodLogged { entry, progress })
    }

    pub fn log_food_item(&self, item: &FoodItem, at: DateTime<Utc>) -> Result<FoodLogged> {
        self.log_food(item.id, item.calories, item.protein, at)
    }

    /// Append a weight entry and refresh the profile's cached weight.
    ///
    /// # Errors
    /// Returns a validation error for a non-positive weight.
    pub fn log_weight(&self, weight: f64, at: DateTime<Utc>) -> Result<WeightEntry> {
        let weight = validate_weight(weight)?;
        let entry = WeightEntry::new(weight, self.day_key(at), at);

        self.write(|db| {
            db.append_weight_entry(&entry)?;
            let mut profile = db.load_profile()?;
            if let Some(latest) = db.latest_weight_entry()? {
                profile.current_weight = latest.weight;
            }
            db.save_profile(&profile)
        })?;

        tracing::debug!(day = %entry.date, weight, "logged weight");
        Ok(entry)
    }

    /// Record a finished routine.
    ///
    /// The streak advances only if this is the day's first completion.
    ///
    /// # Errors
    /// Returns a validation error if a timer exercise is missing from
    /// `exercises_completed`.
    pub fn complete_workout(
        &self,
        exercises_completed: Vec<String>,
        at: DateTime<Utc>,
    ) -> Result<WorkoutCompleted> {
        if !self.routine.is_complete(&exercises_completed) {
            let remaining = self.routine.remaining(&exercises_completed);
            return Err(ValidationError::InvalidValue {
                field: "exercises".into(),
                message: format!("routine incomplete, missing: {}", remaining.join(", ")),
            }
            .into());
        }

        let day = self.day_key(at);
        let entry = WorkoutLogEntry::new(
            day,
            at,
            exercises_completed,
            self.routine.total_duration(),
        );

        let (progress, advance) = self.write(|db| {
            db.append_workout_log(&entry)?;
            let mut progress = db.load_progress(day)?;
            let first_today = progress.mark_workout_complete();
            db.save_progress(&progress)?;

            let advance = if first_today {
                let mut profile = db.load_profile()?;
                let advance = streak::record_workout_completion(&mut profile, &self.tiers);
                db.save_profile(&profile)?;
                Some(advance)
            } else {
                None
            };
            Ok((progress, advance))
        })?;

        match &advance {
            Some(a) => {
                tracing::info!(day = %day, streak = a.current_streak, record = a.record_streak, "streak advanced");
                if a.tier_changed {
                    tracing::info!(tier = %a.tier, "reached new tier");
                }
            }
            None => tracing::debug!(day = %day, "workout already counted today"),
        }

        Ok(WorkoutCompleted {
            entry,
            progress,
            streak: advance,
        })
    }

    /// [`complete_workout`](Self::complete_workout), then send the workout
    /// reward through `notifier` if this was the day's first completion.
    ///
    /// Notifier failures are logged and do not fail the call.
    pub fn complete_workout_and_notify(
        &self,
        exercises_completed: Vec<String>,
        at: DateTime<Utc>,
        notifier: &dyn Notifier,
    ) -> Result<WorkoutCompleted> {
        let completed = self.complete_workout(exercises_completed, at)?;
        if completed.streak.is_some() {
            if let Err(e) = notifier.schedule_advisory(&Advisory::WorkoutReward) {
                tracing::warn!(error = %e, "failed to schedule workout reward");
            }
        }
        Ok(completed)
    }

    /// Count one pull-up for the day of `at` and return the new total.
    pub fn add_pull_up(&self, at: DateTime<Utc>) -> Result<u32> {
        let day = self.day_key(at);
        let count = self.write(|db| {
            let mut progress = db.load_progress(day)?;
            let count = progress.increment_pull_ups();
            db.save_progress(&progress)?;
            Ok(count)
        })?;
        tracing::debug!(day = %day, count, "pull-up counted");
        Ok(count)
    }

    /// Spend a streak freeze. Returns `false` when none are left.
    pub fn use_streak_freeze(&self) -> Result<bool> {
        let used = self.write(|db| {
            let mut profile = db.load_profile()?;
            let used = streak::use_streak_freeze(&mut profile);
            if used {
                db.save_profile(&profile)?;
            }
            Ok(used)
        })?;
        if used {
            tracing::info!("streak freeze used");
        } else {
            tracing::debug!("no streak freeze available");
        }
        Ok(used)
    }

    /// Apply a settings change and return the updated profile.
    ///
    /// # Errors
    /// Returns a validation error for a zero calorie goal.
    pub fn update_settings(&self, update: &SettingsUpdate) -> Result<UserProfile> {
        self.write(|db| {
            let mut profile = db.load_profile()?;
            profile.apply_settings(update)?;
            db.save_profile(&profile)?;
            Ok(profile)
        })
    }

    // ── Reads ───────────────────────────────────────────────────────────

    /// Progress for `day`; zero values if nothing was logged.
    pub fn progress(&self, day: DayKey) -> Result<DailyProgress> {
        self.read(|db| db.load_progress(day))
    }

    pub fn today_progress(&self, now: DateTime<Utc>) -> Result<DailyProgress> {
        self.progress(self.day_key(now))
    }

    pub fn progress_history(&self, from: DayKey, to: DayKey) -> Result<Vec<DailyProgress>> {
        self.read(|db| db.progress_history(from, to))
    }

    pub fn profile(&self) -> Result<UserProfile> {
        self.read(|db| db.load_profile())
    }

    pub fn food_logs(&self) -> Result<Vec<FoodLogEntry>> {
        self.read(|db| db.food_logs())
    }

    pub fn weight_entries(&self) -> Result<Vec<WeightEntry>> {
        self.read(|db| db.weight_entries())
    }

    pub fn workout_logs(&self) -> Result<Vec<WorkoutLogEntry>> {
        self.read(|db| db.workout_logs())
    }

    /// Latest logged weight, or the profile's cached value without history.
    pub fn current_weight(&self) -> Result<f64> {
        self.read(|db| match db.latest_weight_entry()? {
            Some(entry) => Ok(entry.weight),
            None => Ok(db.load_profile()?.current_weight),
        })
    }

    /// Weight trend for the configured window ending on the day of `now`.
    pub fn weight_trend(&self, now: DateTime<Utc>) -> Result<WeightTrend> {
        let today = self.day_key(now);
        let (entries, current) = self.read(|db| {
            let entries = db.weight_entries()?;
            let current = match entries.iter().max_by_key(|e| e.timestamp) {
                Some(latest) => latest.weight,
                None => db.load_profile()?.current_weight,
            };
            Ok((entries, current))
        })?;
        Ok(WeightTrend::compute(
            &entries,
            current,
            today,
            self.trend.window_days,
            self.trend.average_points,
        ))
    }

    /// Advisories that apply at `now`.
    pub fn advisories(&self, now: DateTime<Utc>) -> Result<Vec<Advisory>> {
        let day = self.day_key(now);
        let (progress, profile) =
            self.read(|db| Ok((db.load_progress(day)?, db.load_profile()?)))?;
        Ok(reminders::advisories(
            &progress,
            &profile,
            self.boundary.local_datetime(now),
            &self.advisories,
        ))
    }

    /// Compute advisories and hand each to `notifier`.
    ///
    /// Notifier failures are logged and do not fail the call.
    pub fn notify_advisories(
        &self,
        now: DateTime<Utc>,
        notifier: &dyn Notifier,
    ) -> Result<Vec<Advisory>> {
        let advisories = self.advisories(now)?;
        for advisory in &advisories {
            if let Err(e) = notifier.schedule_advisory(advisory) {
                tracing::warn!(error = %e, ?advisory, "failed to schedule advisory");
            }
        }
        Ok(advisories)
    }

    /// Daily reminder plan for the profile as of `now`.
    pub fn reminder_plan(&self, now: DateTime<Utc>) -> Result<Vec<ReminderSlot>> {
        let profile = self.profile()?;
        Ok(reminders::reminder_plan_for(
            &profile,
            self.boundary.local_datetime(now),
        ))
    }

    /// Whole days since the last logged workout, if there was one.
    ///
    /// Read-only: a gap is reported, never acted on.
    pub fn days_since_last_workout(&self, now: DateTime<Utc>) -> Result<Option<i64>> {
        let today = self.day_key(now);
        let last = self.read(|db| db.last_workout_day())?;
        Ok(last.map(|day| day.days_until(today)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn tracker() -> Tracker {
        Tracker::new(Database::open_memory().unwrap(), &Config::default())
            .with_day_boundary(DayBoundary::Fixed(FixedOffset::west_opt(3 * 3600).unwrap()))
    }

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn full_routine() -> Vec<String> {
        vec!["prancha".into(), "agachamento".into(), "panturrilha".into()]
    }

    #[test]
    fn food_lands_on_local_day() {
        let t = tracker();
        // 01:00 UTC is still the previous evening at UTC-3
        let logged = t.log_food("shake-whey", 200, 25.0, at("2024-01-02T01:00:00Z")).unwrap();
        assert_eq!(logged.progress.date.to_string(), "2024-01-01");
        assert_eq!(t.progress("2024-01-01".parse().unwrap()).unwrap().calories_consumed, 200);
        assert_eq!(t.progress("2024-01-02".parse().unwrap()).unwrap().calories_consumed, 0);
    }

    #[test]
    fn invalid_protein_rejected_before_write() {
        let t = tracker();
        assert!(t.log_food("x", 100, -1.0, at("2024-01-01T12:00:00Z")).is_err());
        assert!(t.food_logs().unwrap().is_empty());
    }

    #[test]
    fn second_workout_same_day_keeps_streak() {
        let t = tracker();
        let first = t.complete_workout(full_routine(), at("2024-01-01T22:00:00Z")).unwrap();
        let second = t.complete_workout(full_routine(), at("2024-01-01T23:00:00Z")).unwrap();

        assert_eq!(first.streak.unwrap().current_streak, 1);
        assert!(second.streak.is_none());
        assert_eq!(t.profile().unwrap().current_streak, 1);
        assert_eq!(t.workout_logs().unwrap().len(), 2);
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Advisory>>);

    impl Notifier for Recorder {
        fn schedule_advisory(&self, advisory: &Advisory) -> Result<()> {
            self.0.lock().unwrap().push(advisory.clone());
            Ok(())
        }
    }

    #[test]
    fn workout_reward_sent_once_per_day() {
        let t = tracker();
        let notifier = Recorder::default();
        t.complete_workout_and_notify(full_routine(), at("2024-01-01T22:00:00Z"), &notifier)
            .unwrap();
        t.complete_workout_and_notify(full_routine(), at("2024-01-01T23:00:00Z"), &notifier)
            .unwrap();
        assert_eq!(*notifier.0.lock().unwrap(), vec![Advisory::WorkoutReward]);

        t.complete_workout_and_notify(full_routine(), at("2024-01-02T22:00:00Z"), &notifier)
            .unwrap();
        assert_eq!(notifier.0.lock().unwrap().len(), 2);
    }

    #[test]
    fn incomplete_routine_rejected() {
        let t = tracker();
        let err = t
            .complete_workout(vec!["prancha".into()], at("2024-01-01T22:00:00Z"))
            .unwrap_err();
        assert!(err.to_string().contains("agachamento"));
        assert!(t.workout_logs().unwrap().is_empty());
    }

    #[test]
    fn weight_updates_cached_profile_weight() {
        let t = tracker();
        assert_eq!(t.current_weight().unwrap(), 50.0);
        t.log_weight(61.2, at("2024-01-01T12:00:00Z")).unwrap();
        t.log_weight(61.8, at("2024-01-02T12:00:00Z")).unwrap();
        assert_eq!(t.current_weight().unwrap(), 61.8);
        assert_eq!(t.profile().unwrap().current_weight, 61.8);
        assert!(t.log_weight(0.0, at("2024-01-03T12:00:00Z")).is_err());
    }

    #[test]
    fn backdated_weight_does_not_replace_latest() {
        let t = tracker();
        t.log_weight(70.0, at("2024-01-05T12:00:00Z")).unwrap();
        t.log_weight(72.0, at("2024-01-01T12:00:00Z")).unwrap();
        assert_eq!(t.current_weight().unwrap(), 70.0);
        assert_eq!(t.profile().unwrap().current_weight, 70.0);
    }

    #[test]
    fn gap_since_last_workout() {
        let t = tracker();
        assert_eq!(t.days_since_last_workout(at("2024-01-03T12:00:00Z")).unwrap(), None);
        t.complete_workout(full_routine(), at("2024-01-01T12:00:00Z")).unwrap();
        assert_eq!(
            t.days_since_last_workout(at("2024-01-03T12:00:00Z")).unwrap(),
            Some(2)
        );
    }

    #[test]
    fn settings_roundtrip() {
        let t = tracker();
        let profile = t
            .update_settings(&SettingsUpdate {
                calorie_goal: Some(2800),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(profile.calorie_goal, 2800);
        assert_eq!(t.profile().unwrap().calorie_goal, 2800);
        assert!(t
            .update_settings(&SettingsUpdate {
                calorie_goal: Some(0),
                ..Default::default()
            })
            .is_err());
        assert_eq!(t.profile().unwrap().calorie_goal, 2800);
    }
}
