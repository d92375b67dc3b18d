//! Configuration commands.
//!
//! Keys are dot paths into `config.toml`, e.g. `trend.window_days` or
//! `advisories.streak_risk_start_hour`. Changes take effect on the next command.

use clap::Subcommand;
use fithome_core::Config;

use super::{print_json, CmdResult};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value
    Get {
        /// Dot-separated key (e.g. "trend.window_days", "day.utc_offset_minutes")
        key: String,
    },
    /// Change one value and save
    Set {
        key: String,
        /// New value; "none" clears an optional value, tier lists take JSON
        value: String,
    },
    /// Every section as JSON
    List,
    /// The file as stored, in TOML
    Show,
    /// Where config.toml lives
    Path,
    /// Overwrite config.toml with the defaults
    Reset,
}

pub fn run(action: ConfigAction) -> CmdResult {
    match action {
        ConfigAction::Get { key } => {
            let value = Config::load()?
                .get(&key)
                .ok_or_else(|| format!("unknown key: {key}"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            tracing::info!(%key, %value, "config updated");
            println!("{}", config.get(&key).unwrap_or(value));
        }
        ConfigAction::List => print_json(&Config::load()?)?,
        ConfigAction::Show => {
            let path = Config::file_path()?;
            // load first so a missing file is created with defaults
            Config::load_from(&path)?;
            print!("{}", std::fs::read_to_string(&path)?);
        }
        ConfigAction::Path => println!("{}", Config::file_path()?.display()),
        ConfigAction::Reset => {
            Config::default().save()?;
            print_json(&Config::default())?;
        }
    }
    Ok(())
}
