//! TOML-based application configuration.
//!
//! Stores tunables that are not part of the user profile:
//! - Weight trend window and averaging length
//! - Advisory time windows and thresholds
//! - Streak tier thresholds
//! - Day boundary (local time or a fixed UTC offset)
//!
//! Configuration is stored at `~/.config/fithome/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::day::DayBoundary;
use crate::error::ConfigError;
use crate::reminders::AdvisoryConfig;
use crate::streak::{Tier, TierTable};
use crate::trend::{DEFAULT_AVERAGE_POINTS, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};

/// Weight trend display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendConfig {
    #[serde(default = "default_window_days")]
    pub window_days: usize,
    #[serde(default = "default_average_points")]
    pub average_points: usize,
}

/// Streak tier thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakConfig {
    #[serde(default = "default_tiers")]
    pub tiers: Vec<Tier>,
}

/// Where one calendar day ends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayConfig {
    /// Minutes east of UTC. Unset means the device's local timezone.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/fithome/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub trend: TrendConfig,
    #[serde(default)]
    pub advisories: AdvisoryConfig,
    #[serde(default)]
    pub streak: StreakConfig,
    #[serde(default)]
    pub day: DayConfig,
}

fn default_window_days() -> usize {
    DEFAULT_WINDOW_DAYS
}
fn default_average_points() -> usize {
    DEFAULT_AVERAGE_POINTS
}
fn default_tiers() -> Vec<Tier> {
    TierTable::default().tiers().to_vec()
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            average_points: default_average_points(),
        }
    }
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            tiers: default_tiers(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    // "none" only survives deserialization for optional fields
                    serde_json::Value::Number(_) if value.eq_ignore_ascii_case("none") => {
                        serde_json::Value::Null
                    }
                    serde_json::Value::Number(_) => parse_number(value).ok_or_else(|| {
                        invalid(format!("cannot parse '{value}' as number"))
                    })?,
                    serde_json::Value::Null => {
                        if value.is_empty() || value.eq_ignore_ascii_case("none") {
                            serde_json::Value::Null
                        } else {
                            parse_number(value).unwrap_or_else(|| value.into())
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    serde_json::Value::String(_) => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Location of `config.toml` in the data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn file_path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|dir| dir.join("config.toml"))
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("config.toml"),
                message: e.to_string(),
            })
    }

    /// Load from disk, writing and returning the default if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::file_path()?)
    }

    /// Load from an explicit path.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let mut cfg: Self =
                    toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
                cfg.clamp_trend_window();
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            // Unreadable but present: leave the user's file untouched
            Err(e) => Err(load_failed(e.to_string())),
        }
    }

    fn clamp_trend_window(&mut self) {
        let clamped = self.trend.window_days.clamp(1, MAX_WINDOW_DAYS);
        if clamped != self.trend.window_days {
            tracing::warn!(
                configured = self.trend.window_days,
                used = clamped,
                "trend.window_days out of range"
            );
            self.trend.window_days = clamped;
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::file_path()?)
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    ///
    /// See [`Config::save`].
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self::default()
        })
    }

    /// The configured tier table, or the built-in one if the list is empty.
    pub fn tier_table(&self) -> TierTable {
        TierTable::new(self.streak.tiers.clone()).unwrap_or_default()
    }

    pub fn day_boundary(&self) -> DayBoundary {
        DayBoundary::from_offset_minutes(self.day.utc_offset_minutes)
    }
}

fn parse_number(value: &str) -> Option<serde_json::Value> {
    if let Ok(n) = value.parse::<i64>() {
        Some(serde_json::Value::Number(n.into()))
    } else {
        value
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(serde_json::Value::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn missing_sections_take_defaults() {
        let parsed: Config = toml::from_str("[trend]\nwindow_days = 30\n").unwrap();
        assert_eq!(parsed.trend.window_days, 30);
        assert_eq!(parsed.trend.average_points, 7);
        assert_eq!(parsed.advisories.calorie_remaining_threshold, 500);
        assert_eq!(parsed.streak.tiers.len(), 4);
        assert!(parsed.day.utc_offset_minutes.is_none());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("trend.window_days").as_deref(), Some("14"));
        assert_eq!(
            cfg.get("advisories.streak_risk_start_hour").as_deref(),
            Some("20")
        );
        assert!(cfg.get("trend.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.set("advisories.calorie_remaining_threshold", "300").unwrap();
        assert_eq!(cfg.advisories.calorie_remaining_threshold, 300);
    }

    #[test]
    fn set_optional_offset_and_clear_it() {
        let mut cfg = Config::default();
        cfg.set("day.utc_offset_minutes", "-180").unwrap();
        assert_eq!(cfg.day.utc_offset_minutes, Some(-180));
        cfg.set("day.utc_offset_minutes", "none").unwrap();
        assert_eq!(cfg.day.utc_offset_minutes, None);
    }

    #[test]
    fn set_replaces_tier_list_from_json() {
        let mut cfg = Config::default();
        cfg.set(
            "streak.tiers",
            r#"[{"name":"Novato","min_days":0},{"name":"Veterano","min_days":3}]"#,
        )
        .unwrap();
        assert_eq!(cfg.tier_table().tier_for(3).unwrap().name, "Veterano");
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("trend.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(cfg.set("", "1").is_err());
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("trend.window_days", "lots"),
            Err(ConfigError::InvalidValue { .. })
        ));
        // Negative numbers do not fit usize
        assert!(cfg.set("trend.window_days", "-1").is_err());
        assert!(cfg.set("trend.window_days", "none").is_err());
        assert_eq!(cfg.trend.window_days, 14);
    }

    #[test]
    fn empty_tier_list_falls_back_to_builtin() {
        let mut cfg = Config::default();
        cfg.streak.tiers.clear();
        assert_eq!(cfg.tier_table(), TierTable::default());
    }

    #[test]
    fn load_from_missing_file_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set("trend.average_points", "5").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().trend.average_points, 5);
    }

    #[test]
    fn unreadable_file_is_left_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let bytes = b"[trend]\nwindow_days = 30\n# caf\xE9\n";
        std::fs::write(&path, bytes).unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
        assert_eq!(std::fs::read(&path).unwrap(), bytes);
    }

    #[test]
    fn oversized_trend_window_is_clamped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[trend]\nwindow_days = 100000000000\n").unwrap();
        assert_eq!(Config::load_from(&path).unwrap().trend.window_days, MAX_WINDOW_DAYS);

        std::fs::write(&path, "[trend]\nwindow_days = 0\n").unwrap();
        assert_eq!(Config::load_from(&path).unwrap().trend.window_days, 1);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "trend = [[[").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
