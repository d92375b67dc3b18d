//! Append-only event records: food, weight and workout logs.
//!
//! Records are immutable once created. Callers validate raw user input with
//! the `validate_*` helpers before building a record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::day::DayKey;
use crate::error::ValidationError;

/// One logged food item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodLogEntry {
    pub id: Uuid,
    pub food_item_id: String,
    pub timestamp: DateTime<Utc>,
    pub calories: u32,
    /// Grams of protein
    pub protein: f64,
}

impl FoodLogEntry {
    pub fn new(food_item_id: impl Into<String>, calories: u32, protein: f64, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            food_item_id: food_item_id.into(),
            timestamp: at,
            calories,
            protein,
        }
    }
}

/// One bodyweight reading, in kilograms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub id: Uuid,
    pub weight: f64,
    pub date: DayKey,
    pub timestamp: DateTime<Utc>,
}

impl WeightEntry {
    pub fn new(weight: f64, date: DayKey, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            weight,
            date,
            timestamp: at,
        }
    }
}

/// A finished workout session.
///
/// Written once, when every timer exercise of the routine is done.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutLogEntry {
    pub id: Uuid,
    pub date: DayKey,
    pub timestamp: DateTime<Utc>,
    pub exercises_completed: Vec<String>,
    /// Seconds
    pub total_duration: u32,
}

impl WorkoutLogEntry {
    pub fn new(
        date: DayKey,
        at: DateTime<Utc>,
        exercises_completed: Vec<String>,
        total_duration: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            timestamp: at,
            exercises_completed,
            total_duration,
        }
    }
}

/// Reject non-finite or non-positive weights.
pub fn validate_weight(weight: f64) -> Result<f64, ValidationError> {
    if weight.is_finite() && weight > 0.0 {
        Ok(weight)
    } else {
        Err(ValidationError::InvalidValue {
            field: "weight".into(),
            message: format!("must be a positive number of kilograms, got {weight}"),
        })
    }
}

pub fn validate_calorie_goal(goal: u32) -> Result<u32, ValidationError> {
    if goal == 0 {
        return Err(ValidationError::InvalidValue {
            field: "calorie_goal".into(),
            message: "must be greater than zero".into(),
        });
    }
    Ok(goal)
}

/// Protein must be a finite, non-negative number of grams.
pub fn validate_protein(protein: f64) -> Result<f64, ValidationError> {
    if protein.is_finite() && protein >= 0.0 {
        Ok(protein)
    } else {
        Err(ValidationError::InvalidValue {
            field: "protein".into(),
            message: format!("must be a non-negative number of grams, got {protein}"),
        })
    }
}
