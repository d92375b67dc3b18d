use clap::Subcommand;
use serde_json::json;

use super::{print_json, tracker, CmdResult};

#[derive(Subcommand)]
pub enum StreakAction {
    /// Current streak, record, tier and distance to the next tier
    Status,
    /// Spend a streak freeze
    Freeze,
    /// The tier table
    Tiers,
}

pub fn run(action: StreakAction) -> CmdResult {
    let tracker = tracker()?;

    match action {
        StreakAction::Status => {
            let profile = tracker.profile()?;
            let next = tracker
                .tiers()
                .next_after(profile.current_streak)
                .map(|(tier, days)| json!({ "tier": tier.name, "days_to_go": days }));
            print_json(&json!({
                "current_streak": profile.current_streak,
                "record_streak": profile.record_streak,
                "tier": profile.tier,
                "next_tier": next,
                "streak_freezes_available": profile.streak_freezes_available,
                "streak_freezes_used": profile.streak_freezes_used,
            }))
        }
        StreakAction::Freeze => {
            if tracker.use_streak_freeze()? {
                print_json(&tracker.profile()?)
            } else {
                Err("no streak freezes available".into())
            }
        }
        StreakAction::Tiers => print_json(&tracker.tiers().tiers()),
    }
}
