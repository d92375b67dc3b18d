//! Workout streak and tier engine.
//!
//! The streak only ever moves forward here: one step per call to
//! [`record_workout_completion`]. Callers guarantee at most one call per
//! calendar day by gating it on [`DailyProgress::mark_workout_complete`].
//!
//! [`DailyProgress::mark_workout_complete`]: crate::progress::DailyProgress::mark_workout_complete

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::profile::UserProfile;

/// A named rank unlocked at `min_days` of streak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub name: String,
    pub min_days: u32,
}

impl Tier {
    pub fn new(name: impl Into<String>, min_days: u32) -> Self {
        Self {
            name: name.into(),
            min_days,
        }
    }
}

/// Tier thresholds, kept sorted from lowest to highest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTable {
    tiers: Vec<Tier>,
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            tiers: vec![
                Tier::new("Ectomorfo Sedentário", 0),
                Tier::new("Iniciante Ativo", 7),
                Tier::new("Praticante Regular", 30),
                Tier::new("Atleta Home Office", 90),
            ],
        }
    }
}

impl TierTable {
    /// Build a table from tiers in any order.
    ///
    /// # Errors
    /// Returns an error if the table is empty.
    pub fn new(mut tiers: Vec<Tier>) -> Result<Self, ValidationError> {
        if tiers.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "tiers".into(),
                message: "tier table must not be empty".into(),
            });
        }
        tiers.sort_by_key(|t| t.min_days);
        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn lowest(&self) -> &Tier {
        &self.tiers[0]
    }

    /// Index of the most advanced tier reached at `streak`.
    ///
    /// Scans from the highest threshold down, so equal thresholds resolve to
    /// the later entry.
    pub fn rank(&self, streak: u32) -> Option<usize> {
        self.tiers
            .iter()
            .enumerate()
            .rev()
            .find(|(_, t)| t.min_days <= streak)
            .map(|(i, _)| i)
    }

    pub fn tier_for(&self, streak: u32) -> Option<&Tier> {
        self.rank(streak).map(|i| &self.tiers[i])
    }

    /// Next tier above `streak` and the days still missing to reach it.
    pub fn next_after(&self, streak: u32) -> Option<(&Tier, u32)> {
        self.tiers
            .iter()
            .find(|t| t.min_days > streak)
            .map(|t| (t, t.min_days - streak))
    }
}

/// What a single workout completion did to the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakAdvance {
    pub previous_streak: u32,
    pub current_streak: u32,
    pub record_streak: u32,
    pub new_record: bool,
    pub tier: String,
    pub tier_changed: bool,
}

/// Advance the streak by one day and recompute record and tier.
pub fn record_workout_completion(profile: &mut UserProfile, tiers: &TierTable) -> StreakAdvance {
    let previous_streak = profile.current_streak;
    profile.current_streak = profile.current_streak.saturating_add(1);

    let new_record = profile.current_streak > profile.record_streak;
    if new_record {
        profile.record_streak = profile.current_streak;
    }

    let previous_tier = profile.tier.clone();
    if let Some(tier) = tiers.tier_for(profile.current_streak) {
        profile.tier = tier.name.clone();
    }

    StreakAdvance {
        previous_streak,
        current_streak: profile.current_streak,
        record_streak: profile.record_streak,
        new_record,
        tier_changed: profile.tier != previous_tier,
        tier: profile.tier.clone(),
    }
}

/// Spend one streak freeze if any are left.
pub fn use_streak_freeze(profile: &mut UserProfile) -> bool {
    if profile.streak_freezes_available == 0 {
        return false;
    }
    profile.streak_freezes_available -= 1;
    profile.streak_freezes_used = profile.streak_freezes_used.saturating_add(1);
    true
}
