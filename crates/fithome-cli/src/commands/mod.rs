pub mod config;
pub mod food;
pub mod profile;
pub mod progress;
pub mod reminders;
pub mod streak;
pub mod weight;
pub mod workout;

use chrono::{DateTime, Utc};
use fithome_core::Tracker;
use serde::Serialize;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Open the tracker over the on-disk store and configuration.
pub fn tracker() -> Result<Tracker, Box<dyn std::error::Error>> {
    Ok(Tracker::open()?)
}

/// `--at` if given, otherwise the current instant.
pub fn instant(at: Option<DateTime<Utc>>) -> DateTime<Utc> {
    at.unwrap_or_else(Utc::now)
}

pub fn print_json<T: Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
