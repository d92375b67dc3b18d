use chrono::{DateTime, Utc};
use clap::Subcommand;
use fithome_core::error::Result;
use fithome_core::{Advisory, Notifier, ReminderSlot};

use super::{instant, print_json, tracker, CmdResult};

#[derive(Subcommand)]
pub enum RemindersAction {
    /// Daily repeating reminders for the current settings
    Plan {
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Advisories that apply right now
    Advisories {
        #[arg(long)]
        at: Option<DateTime<Utc>>,
        /// Also send them through the log notifier
        #[arg(long)]
        notify: bool,
    },
}

/// Stands in for a platform scheduler by writing to the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn schedule_daily(&self, plan: &[ReminderSlot]) -> Result<()> {
        for slot in plan {
            tracing::info!(id = %slot.id, time = %slot.time, "{}", slot.title);
        }
        Ok(())
    }

    fn schedule_advisory(&self, advisory: &Advisory) -> Result<()> {
        tracing::info!(title = advisory.title(), "{}", advisory.body());
        Ok(())
    }
}

pub fn run(action: RemindersAction) -> CmdResult {
    let tracker = tracker()?;

    match action {
        RemindersAction::Plan { at } => {
            let plan = tracker.reminder_plan(instant(at))?;
            LogNotifier.schedule_daily(&plan)?;
            print_json(&plan)
        }
        RemindersAction::Advisories { at, notify } => {
            let now = instant(at);
            let advisories = if notify {
                tracker.notify_advisories(now, &LogNotifier)?
            } else {
                tracker.advisories(now)?
            };
            print_json(&advisories)
        }
    }
}
