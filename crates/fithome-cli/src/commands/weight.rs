use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde_json::json;

use super::{instant, print_json, tracker, CmdResult};

#[derive(Subcommand)]
pub enum WeightAction {
    /// Log a bodyweight in kilograms
    Log {
        kg: f64,
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// List every weight entry
    List,
    /// Latest logged weight
    Current,
    /// Moving-average trend over the configured window
    Trend {
        /// Day the window ends on (RFC 3339 instant, defaults to now)
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
}

pub fn run(action: WeightAction) -> CmdResult {
    let tracker = tracker()?;

    match action {
        WeightAction::Log { kg, at } => print_json(&tracker.log_weight(kg, instant(at))?),
        WeightAction::List => print_json(&tracker.weight_entries()?),
        WeightAction::Current => print_json(&json!({ "current_weight": tracker.current_weight()? })),
        WeightAction::Trend { at } => print_json(&tracker.weight_trend(instant(at))?),
    }
}
