//! Profile and settings commands.

use clap::Subcommand;
use fithome_core::{SettingsUpdate, TimeOfDay};

use super::{print_json, tracker, CmdResult};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the profile
    Show,
    /// Change settings; omitted flags stay unchanged
    Set {
        #[arg(long)]
        calorie_goal: Option<u32>,
        /// HH:MM
        #[arg(long)]
        workout_time: Option<TimeOfDay>,
        /// HH:MM, also the time of the daily workout reminder
        #[arg(long)]
        shutdown_time: Option<TimeOfDay>,
        #[arg(long)]
        meal_reminders: Option<bool>,
        #[arg(long)]
        posture_reminders: Option<bool>,
    },
}

pub fn run(action: ProfileAction) -> CmdResult {
    let tracker = tracker()?;

    match action {
        ProfileAction::Show => print_json(&tracker.profile()?),
        ProfileAction::Set {
            calorie_goal,
            workout_time,
            shutdown_time,
            meal_reminders,
            posture_reminders,
        } => {
            let update = SettingsUpdate {
                calorie_goal,
                workout_time,
                shutdown_time,
                meal_reminders,
                posture_reminders,
            };
            if update.is_empty() {
                return Err("nothing to change".into());
            }
            print_json(&tracker.update_settings(&update)?)
        }
    }
}
