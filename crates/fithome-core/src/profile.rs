//! The single user profile: streak counters, goals and reminder settings.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::records::validate_calorie_goal;
use crate::streak::TierTable;

/// Wall-clock time of day, written as `HH:MM`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(Self)
            .map_err(|_| ValidationError::InvalidTime(s.to_string()))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> Self {
        t.to_string()
    }
}

/// Installation-wide user state.
///
/// Missing fields in a stored profile are filled from [`UserProfile::default`],
/// so new fields can be added without breaking old data. The camelCase names
/// written by the mobile app are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    #[serde(alias = "currentStreak")]
    pub current_streak: u32,
    /// Never below `current_streak`
    #[serde(alias = "recordStreak")]
    pub record_streak: u32,
    #[serde(alias = "streakFreezesAvailable")]
    pub streak_freezes_available: u32,
    #[serde(alias = "streakFreezesUsed")]
    pub streak_freezes_used: u32,
    pub tier: String,
    /// Cached copy of the latest weight entry, in kilograms.
    #[serde(alias = "currentWeight")]
    pub current_weight: f64,
    #[serde(alias = "calorieGoal")]
    pub calorie_goal: u32,
    #[serde(alias = "workoutTime")]
    pub workout_time: TimeOfDay,
    #[serde(alias = "shutdownTime")]
    pub shutdown_time: TimeOfDay,
    #[serde(alias = "mealReminders")]
    pub meal_reminders: bool,
    #[serde(alias = "postureReminders")]
    pub posture_reminders: bool,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            current_streak: 0,
            record_streak: 0,
            streak_freezes_available: 2,
            streak_freezes_used: 0,
            tier: TierTable::default().lowest().name.clone(),
            current_weight: 50.0,
            calorie_goal: 2500,
            workout_time: TimeOfDay::new(22, 0).unwrap_or_default(),
            shutdown_time: TimeOfDay::new(18, 0).unwrap_or_default(),
            meal_reminders: true,
            posture_reminders: true,
        }
    }
}

/// Partial update from the settings screen. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub calorie_goal: Option<u32>,
    pub workout_time: Option<TimeOfDay>,
    pub shutdown_time: Option<TimeOfDay>,
    pub meal_reminders: Option<bool>,
    pub posture_reminders: Option<bool>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl UserProfile {
    /// Apply a settings update, validating the calorie goal first.
    pub fn apply_settings(&mut self, update: &SettingsUpdate) -> Result<(), ValidationError> {
        if let Some(goal) = update.calorie_goal {
            self.calorie_goal = validate_calorie_goal(goal)?;
        }
        if let Some(t) = update.workout_time {
            self.workout_time = t;
        }
        if let Some(t) = update.shutdown_time {
            self.shutdown_time = t;
        }
        if let Some(on) = update.meal_reminders {
            self.meal_reminders = on;
        }
        if let Some(on) = update.posture_reminders {
            self.posture_reminders = on;
        }
        Ok(())
    }
}
