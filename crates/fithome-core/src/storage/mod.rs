mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, DayConfig, StreakConfig, TrendConfig};
pub use database::Database;

use std::path::PathBuf;

/// Returns the data directory, creating it if needed.
///
/// `FITHOME_DATA_DIR` wins when set. Otherwise the directory is
/// `~/.config/fithome[-dev]/`, with FITHOME_ENV=dev selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("FITHOME_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("FITHOME_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("fithome-dev")
            } else {
                base_dir.join("fithome")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
