use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "fithome-cli", version, about = "FitHome CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Food logging and the built-in catalog
    Food {
        #[command(subcommand)]
        action: commands::food::FoodAction,
    },
    /// Bodyweight logging and trend
    Weight {
        #[command(subcommand)]
        action: commands::weight::WeightAction,
    },
    /// Workout routine, completion and pull-ups
    Workout {
        #[command(subcommand)]
        action: commands::workout::WorkoutAction,
    },
    /// Daily progress
    Progress {
        #[command(subcommand)]
        action: commands::progress::ProgressAction,
    },
    /// User profile and settings
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Streak, tier and freezes
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Reminder plan and advisories
    Reminders {
        #[command(subcommand)]
        action: commands::reminders::RemindersAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fithome_core=info,fithome_cli=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Food { action } => commands::food::run(action),
        Commands::Weight { action } => commands::weight::run(action),
        Commands::Workout { action } => commands::workout::run(action),
        Commands::Progress { action } => commands::progress::run(action),
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Streak { action } => commands::streak::run(action),
        Commands::Reminders { action } => commands::reminders::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
