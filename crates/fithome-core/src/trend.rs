//! Weight trend: a dense daily series and its trailing moving average.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::day::DayKey;
use crate::records::WeightEntry;

pub const DEFAULT_WINDOW_DAYS: usize = 14;
pub const DEFAULT_AVERAGE_POINTS: usize = 7;
/// Longest window a trend will build, one leap year of days.
pub const MAX_WINDOW_DAYS: usize = 366;

/// Points back from today used for the weekly delta.
const WEEK: usize = 7;

/// One day of the displayed trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: DayKey,
    /// Logged weight for the day, or the fallback when nothing was logged.
    pub weight: f64,
    /// Whether `weight` came from an actual entry.
    pub logged: bool,
    pub moving_average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTrend {
    pub current_weight: f64,
    pub points: Vec<TrendPoint>,
    /// Kilograms gained over the last week, rounded to one decimal.
    pub weekly_delta: f64,
}

impl WeightTrend {
    /// Build the trend for the `window_days` days ending on `today`.
    ///
    /// Days without an entry take `current_weight`. When several entries share
    /// a day, the one with the latest timestamp wins.
    pub fn compute(
        entries: &[WeightEntry],
        current_weight: f64,
        today: DayKey,
        window_days: usize,
        average_points: usize,
    ) -> Self {
        let window_days = window_days.clamp(1, MAX_WINDOW_DAYS);

        let mut ordered: Vec<&WeightEntry> = entries.iter().collect();
        ordered.sort_by_key(|e| e.timestamp);
        let by_day: HashMap<DayKey, f64> = ordered.iter().map(|e| (e.date, e.weight)).collect();

        let days: Vec<DayKey> = (0..window_days)
            .map(|i| today.days_before(u32::try_from(window_days - 1 - i).unwrap_or(u32::MAX)))
            .collect();
        let series: Vec<f64> = days
            .iter()
            .map(|d| by_day.get(d).copied().unwrap_or(current_weight))
            .collect();
        let averages = trailing_average(&series, average_points);

        let weekly_delta = if entries.len() >= WEEK {
            let week_ago = series
                .len()
                .checked_sub(1 + WEEK)
                .map(|i| series[i])
                .unwrap_or(current_weight);
            round_one_decimal(current_weight - week_ago)
        } else {
            0.0
        };

        let points = days
            .into_iter()
            .zip(series)
            .zip(averages)
            .map(|((date, weight), moving_average)| TrendPoint {
                logged: by_day.contains_key(&date),
                date,
                weight,
                moving_average,
            })
            .collect();

        Self {
            current_weight,
            points,
            weekly_delta,
        }
    }

    /// The trend over the default 14-day window with a 7-point average.
    pub fn fortnight(entries: &[WeightEntry], current_weight: f64, today: DayKey) -> Self {
        Self::compute(
            entries,
            current_weight,
            today,
            DEFAULT_WINDOW_DAYS,
            DEFAULT_AVERAGE_POINTS,
        )
    }

    pub fn averages(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.moving_average).collect()
    }
}

/// Backward-looking simple moving average.
///
/// Index `i` averages the last `min(i + 1, points)` values up to and
/// including `i`; nothing after `i` is read.
pub fn trailing_average(series: &[f64], points: usize) -> Vec<f64> {
    let points = points.max(1);
    (0..series.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(points);
            let slice = &series[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

fn round_one_decimal(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    // avoid printing "-0.0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
