use chrono::{DateTime, Utc};
use clap::Subcommand;
use fithome_core::DayKey;

use super::{instant, print_json, tracker, CmdResult};

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Today's progress
    Today {
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Progress for one day (YYYY-MM-DD)
    Day { day: DayKey },
    /// Days with recorded progress in the trailing window
    History {
        /// Window length in days, ending today
        #[arg(long, default_value_t = 7)]
        days: u32,
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
}

pub fn run(action: ProgressAction) -> CmdResult {
    let tracker = tracker()?;

    match action {
        ProgressAction::Today { at } => print_json(&tracker.today_progress(instant(at))?),
        ProgressAction::Day { day } => print_json(&tracker.progress(day)?),
        ProgressAction::History { days, at } => {
            let today = tracker.day_key(instant(at));
            let from = today.days_before(days.saturating_sub(1));
            print_json(&tracker.progress_history(from, today)?)
        }
    }
}
