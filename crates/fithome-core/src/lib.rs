//! # FitHome Core Library
//!
//! Core logic for the FitHome habit tracker: food, bodyweight and a short
//! home workout routine, with a daily streak on top. The CLI is a thin layer
//! over this crate.
//!
//! ## Architecture
//!
//! - **Day bucketing**: every event is filed under the calendar day it
//!   happened on, in local time or a configured fixed offset
//! - **Aggregation**: one [`DailyProgress`] per day, updated by pure functions
//! - **Streaks**: a workout completion advances the streak at most once a day
//!   and re-ranks the tier
//! - **Storage**: SQLite for records and the profile, TOML for configuration
//!
//! ## Key Components
//!
//! - [`Tracker`]: serialized read-modify-write over the store
//! - [`Database`]: record persistence
//! - [`Config`]: application configuration management
//! - [`WeightTrend`]: trailing moving average over the weight series

pub mod catalog;
pub mod day;
pub mod error;
pub mod profile;
pub mod progress;
pub mod records;
pub mod reminders;
pub mod storage;
pub mod streak;
pub mod tracker;
pub mod trend;

pub use catalog::{Exercise, ExerciseKind, FoodItem, Routine, ENERGY_BOOST, EXERCISES, FOOD_ITEMS};
pub use day::{DayBoundary, DayKey};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use profile::{SettingsUpdate, TimeOfDay, UserProfile};
pub use progress::DailyProgress;
pub use records::{FoodLogEntry, WeightEntry, WorkoutLogEntry};
pub use reminders::{Advisory, AdvisoryConfig, Notifier, ReminderKind, ReminderSlot};
pub use storage::{Config, Database};
pub use streak::{StreakAdvance, Tier, TierTable};
pub use tracker::{FoodLogged, Tracker, WorkoutCompleted};
pub use trend::{TrendPoint, WeightTrend};
