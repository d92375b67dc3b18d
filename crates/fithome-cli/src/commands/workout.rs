use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde_json::json;

use super::reminders::LogNotifier;
use super::{instant, print_json, tracker, CmdResult};

#[derive(Subcommand)]
pub enum WorkoutAction {
    /// Show the routine
    Routine,
    /// Record a finished routine
    Complete {
        /// Completed exercise id; repeat for each. Defaults to the whole routine.
        #[arg(long = "exercise")]
        exercises: Vec<String>,
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Count one pull-up
    PullUp {
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// List every workout log entry
    List,
    /// Days since the last logged workout
    Gap {
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
}

pub fn run(action: WorkoutAction) -> CmdResult {
    let tracker = tracker()?;

    match action {
        WorkoutAction::Routine => {
            let routine = tracker.routine();
            print_json(&json!({
                "exercises": routine.exercises(),
                "total_duration": routine.total_duration(),
            }))
        }
        WorkoutAction::Complete { exercises, at } => {
            let exercises = if exercises.is_empty() {
                tracker
                    .routine()
                    .timer_exercises()
                    .map(|e| e.id.to_string())
                    .collect()
            } else {
                exercises
            };
            print_json(&tracker.complete_workout_and_notify(exercises, instant(at), &LogNotifier)?)
        }
        WorkoutAction::PullUp { at } => {
            let count = tracker.add_pull_up(instant(at))?;
            print_json(&json!({ "pull_ups_today": count }))
        }
        WorkoutAction::List => print_json(&tracker.workout_logs()?),
        WorkoutAction::Gap { at } => {
            let days = tracker.days_since_last_workout(instant(at))?;
            print_json(&json!({ "days_since_last_workout": days }))
        }
    }
}
