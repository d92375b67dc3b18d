//! Calendar-day bucketing.
//!
//! Every event is filed under the calendar day it happened on in the
//! device's local time. Keys print as `YYYY-MM-DD`, so their string order is
//! also their chronological order.

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

const KEY_FORMAT: &str = "%Y-%m-%d";

/// Calendar-day identifier in local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Bucket an instant into its calendar day as seen from `tz`.
    pub fn from_instant<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> Self {
        Self(instant.with_timezone(tz).date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The day `days` calendar days before this one.
    pub fn days_before(&self, days: u32) -> Self {
        Self(self.0 - Duration::days(i64::from(days)))
    }

    /// Signed number of days from `self` to `later`.
    pub fn days_until(&self, later: DayKey) -> i64 {
        (later.0 - self.0).num_days()
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(KEY_FORMAT))
    }
}

impl FromStr for DayKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, KEY_FORMAT)
            .map(Self)
            .map_err(|e| ValidationError::InvalidValue {
                field: "day".into(),
                message: format!("'{s}' is not a YYYY-MM-DD date: {e}"),
            })
    }
}

impl TryFrom<String> for DayKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DayKey> for String {
    fn from(key: DayKey) -> Self {
        key.to_string()
    }
}

/// Which clock decides where one day ends and the next begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayBoundary {
    /// The device's local timezone.
    #[default]
    Local,
    /// A fixed UTC offset, mostly useful for deterministic tests.
    Fixed(FixedOffset),
}

impl DayBoundary {
    /// Build from an optional offset in minutes east of UTC.
    ///
    /// Out-of-range offsets fall back to local time.
    pub fn from_offset_minutes(minutes: Option<i32>) -> Self {
        minutes
            .and_then(|m| FixedOffset::east_opt(m.saturating_mul(60)))
            .map(Self::Fixed)
            .unwrap_or(Self::Local)
    }

    pub fn key(&self, at: DateTime<Utc>) -> DayKey {
        match self {
            Self::Local => DayKey::from_instant(at, &Local),
            Self::Fixed(offset) => DayKey::from_instant(at, offset),
        }
    }

    /// Wall-clock reading of `at` on this boundary's clock.
    pub fn local_datetime(&self, at: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Self::Local => at.with_timezone(&Local).naive_local(),
            Self::Fixed(offset) => at.with_timezone(offset).naive_local(),
        }
    }
}
