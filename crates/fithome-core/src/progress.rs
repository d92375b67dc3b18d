//! Per-day progress aggregation.
//!
//! One [`DailyProgress`] exists per calendar day. It is created lazily with
//! every accumulator at zero, and its accumulators only ever grow. The
//! functions here are pure; persisting the result is the store's job.

use serde::{Deserialize, Serialize};

use crate::day::DayKey;

/// Running totals for a single calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub date: DayKey,
    #[serde(default)]
    pub calories_consumed: u32,
    #[serde(default)]
    pub protein_consumed: f64,
    #[serde(default)]
    pub workout_completed: bool,
    #[serde(default)]
    pub pull_ups_today: u32,
}

impl DailyProgress {
    /// Zero-valued record for a day with no events yet.
    pub fn empty(date: DayKey) -> Self {
        Self {
            date,
            calories_consumed: 0,
            protein_consumed: 0.0,
            workout_completed: false,
            pull_ups_today: 0,
        }
    }

    /// Add one food-log event's nutrition to the day.
    ///
    /// Every call is a distinct event; nothing is deduplicated.
    pub fn apply_nutrition(&mut self, calories: u32, protein: f64) {
        self.calories_consumed = self.calories_consumed.saturating_add(calories);
        if protein.is_finite() && protein > 0.0 {
            self.protein_consumed += protein;
        }
    }

    /// Flag the day's workout as done.
    ///
    /// Returns `true` only when this call changed the flag, which is what
    /// lets the streak advance at most once per day.
    pub fn mark_workout_complete(&mut self) -> bool {
        let newly_completed = !self.workout_completed;
        self.workout_completed = true;
        newly_completed
    }

    /// Count one pull-up and return the day's new total.
    pub fn increment_pull_ups(&mut self) -> u32 {
        self.pull_ups_today = self.pull_ups_today.saturating_add(1);
        self.pull_ups_today
    }

    /// Calories still missing to reach `goal`; zero once it is met.
    pub fn calories_remaining(&self, goal: u32) -> u32 {
        goal.saturating_sub(self.calories_consumed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn day() -> DayKey {
        "2024-01-01".parse().unwrap()
    }

    #[test]
    fn empty_record_is_all_zero() {
        let p = DailyProgress::empty(day());
        assert_eq!(p.date.to_string(), "2024-01-01");
        assert_eq!(p.calories_consumed, 0);
        assert_eq!(p.protein_consumed, 0.0);
        assert!(!p.workout_completed);
        assert_eq!(p.pull_ups_today, 0);
    }

    #[test]
    fn nutrition_accumulates() {
        let mut p = DailyProgress::empty(day());
        p.apply_nutrition(350, 6.0);
        p.apply_nutrition(200, 25.0);
        assert_eq!(p.calories_consumed, 550);
        assert_eq!(p.protein_consumed, 31.0);
    }

    #[test]
    fn negative_protein_never_shrinks_total() {
        let mut p = DailyProgress::empty(day());
        p.apply_nutrition(100, 10.0);
        p.apply_nutrition(0, -5.0);
        assert_eq!(p.protein_consumed, 10.0);
    }

    #[test]
    fn workout_flag_is_idempotent() {
        let mut once = DailyProgress::empty(day());
        assert!(once.mark_workout_complete());

        let mut twice = DailyProgress::empty(day());
        twice.mark_workout_complete();
        assert!(!twice.mark_workout_complete());

        assert_eq!(once, twice);
    }

    #[test]
    fn pull_ups_return_running_count() {
        let mut p = DailyProgress::empty(day());
        let counts: Vec<u32> = (0..5).map(|_| p.increment_pull_ups()).collect();
        assert_eq!(counts, vec![1, 2, 3, 4, 5]);
        assert_eq!(p.pull_ups_today, 5);
    }

    #[test]
    fn remaining_calories_saturate() {
        let mut p = DailyProgress::empty(day());
        p.apply_nutrition(2000, 0.0);
        assert_eq!(p.calories_remaining(2500), 500);
        p.apply_nutrition(900, 0.0);
        assert_eq!(p.calories_remaining(2500), 0);
    }

    #[test]
    fn missing_fields_deserialize_as_zero() {
        let p: DailyProgress = serde_json::from_str(r#"{"date":"2024-01-01"}"#).unwrap();
        assert_eq!(p, DailyProgress::empty(day()));
    }

    proptest! {
        #[test]
        fn calories_equal_sum_in_any_order(mut deltas in prop::collection::vec(0u32..2_000, 0..40)) {
            let expected: u32 = deltas.iter().sum();

            let mut forward = DailyProgress::empty(day());
            for d in &deltas {
                forward.apply_nutrition(*d, 1.0);
            }
            deltas.reverse();
            let mut backward = DailyProgress::empty(day());
            for d in &deltas {
                backward.apply_nutrition(*d, 1.0);
            }

            prop_assert_eq!(forward.calories_consumed, expected);
            prop_assert_eq!(backward.calories_consumed, expected);
        }

        #[test]
        fn nth_pull_up_returns_n(n in 1usize..200) {
            let mut p = DailyProgress::empty(day());
            for i in 1..=n {
                prop_assert_eq!(p.increment_pull_ups() as usize, i);
            }
        }
    }
}
