//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Theme
//! - Notification preferences
//! - Habit limits (count, name and description length)
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result};

/// Color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Dark,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub daily_reminder: bool,
    #[serde(default = "default_true")]
    pub streak_reminder: bool,
    #[serde(default)]
    pub motivational_message: bool,
    /// Daily reminder time, `HH:MM`.
    #[serde(default = "default_reminder_time")]
    pub reminder_time: String,
    #[serde(default = "default_true")]
    pub sound: bool,
    #[serde(default = "default_true")]
    pub vibration: bool,
    #[serde(default)]
    pub daily_summary: bool,
    #[serde(default = "default_true")]
    pub milestones: bool,
}

/// Limits applied to user input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_habits")]
    pub max_habits: usize,
    #[serde(default = "default_min_name_len")]
    pub min_name_len: usize,
    #[serde(default = "default_max_name_len")]
    pub max_name_len: usize,
    #[serde(default = "default_max_description_len")]
    pub max_description_len: usize,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

fn default_true() -> bool {
    true
}
fn default_reminder_time() -> String {
    "09:00".into()
}
fn default_max_habits() -> usize {
    10
}
fn default_min_name_len() -> usize {
    2
}
fn default_max_name_len() -> usize {
    50
}
fn default_max_description_len() -> usize {
    200
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            daily_reminder: true,
            streak_reminder: true,
            motivational_message: false,
            reminder_time: default_reminder_time(),
            sound: true,
            vibration: true,
            daily_summary: false,
            milestones: true,
        }
    }
}

impl NotificationsConfig {
    /// The daily reminder time, `None` when it is not a valid `HH:MM`.
    pub fn reminder_at(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.reminder_time, "%H:%M").ok()
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_habits: default_max_habits(),
            min_name_len: default_min_name_len(),
            max_name_len: default_max_name_len(),
            max_description_len: default_max_description_len(),
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
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot set a whole section".into()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                CoreError::from(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
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

    /// Set a config value by dot-separated key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        if updated.notifications.reminder_at().is_none() {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("'{}' is not HH:MM", updated.notifications.reminder_time),
            }
            .into());
        }
        *self = updated;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default config");
            Self::default()
        })
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
        assert_eq!(parsed.theme, Theme::Default);
        assert_eq!(parsed.limits.max_habits, 10);
        assert_eq!(parsed.notifications.reminder_time, "09:00");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("theme = \"dark\"\n[notifications]\nenabled = true\n").unwrap();
        assert_eq!(parsed.theme, Theme::Dark);
        assert!(parsed.notifications.enabled);
        assert!(parsed.notifications.milestones);
        assert_eq!(parsed.limits.max_name_len, 50);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("theme").as_deref(), Some("default"));
        assert_eq!(cfg.get("limits.max_habits").as_deref(), Some("10"));
        assert_eq!(cfg.get("notifications.milestones").as_deref(), Some("true"));
        assert!(cfg.get("notifications.missing_key").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.set("notifications.enabled", "true").unwrap();
        cfg.set("limits.max_habits", "3").unwrap();
        cfg.set("theme", "dark").unwrap();
        cfg.set("notifications.reminder_time", "07:30").unwrap();
        assert!(cfg.notifications.enabled);
        assert_eq!(cfg.limits.max_habits, 3);
        assert_eq!(cfg.theme, Theme::Dark);
        assert_eq!(cfg.notifications.reminder_time, "07:30");
    }

    #[test]
    fn set_rejects_unknown_keys_and_bad_values() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("notifications.nonexistent", "1"),
            Err(CoreError::Config(ConfigError::UnknownKey(_)))
        ));
        assert!(matches!(
            cfg.set("notifications.enabled", "maybe"),
            Err(CoreError::Config(ConfigError::InvalidValue { .. }))
        ));
        assert!(matches!(
            cfg.set("theme", "neon"),
            Err(CoreError::Config(ConfigError::InvalidValue { .. }))
        ));
        assert!(matches!(
            cfg.set("limits", "3"),
            Err(CoreError::Config(ConfigError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn set_rejects_malformed_reminder_time() {
        let mut cfg = Config::default();
        for bad in ["99:99", "9am", ""] {
            assert!(matches!(
                cfg.set("notifications.reminder_time", bad),
                Err(CoreError::Config(ConfigError::InvalidValue { .. }))
            ));
        }
        assert_eq!(cfg.notifications.reminder_time, "09:00");
        assert_eq!(
            cfg.notifications.reminder_at(),
            NaiveTime::from_hms_opt(9, 0, 0)
        );
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.limits.max_habits, 10);
        assert!(path.exists());

        let mut edited = cfg.clone();
        edited.theme = Theme::Dark;
        edited.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().theme, Theme::Dark);
    }
}
