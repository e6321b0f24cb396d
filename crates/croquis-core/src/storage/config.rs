//! TOML-based application configuration.
//!
//! Only preferences survive restarts:
//! - Timer preset or custom interval
//! - Repeat avoidance across cycle boundaries
//! - Host scheduling knobs (tick period, prefetch depth)
//!
//! Queue order and clock state are never persisted.
//!
//! Configuration is stored at `~/.config/croquis/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use super::data_dir;
use crate::duration::{TimerConfig, MAX_CUSTOM_SECONDS, MIN_CUSTOM_SECONDS};
use crate::error::ConfigError;

/// Session behaviour configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Reshuffle on exhaustion, keeping the next cycle from opening with the
    /// image that closed the last one.
    #[serde(default = "default_true")]
    pub avoid_repeat: bool,
    /// Period of the host's tick trigger.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// How many upcoming images a host should prefetch.
    #[serde(default = "default_prefetch_limit")]
    pub prefetch_limit: usize,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/croquis/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

fn default_true() -> bool {
    true
}
fn default_tick_interval_ms() -> u64 {
    100
}
fn default_prefetch_limit() -> usize {
    10
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            avoid_repeat: true,
            tick_interval_ms: default_tick_interval_ms(),
            prefetch_limit: default_prefetch_limit(),
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
        if parts.peek().is_none() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                // Unset optionals serialize as null and are still known keys.
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = if matches!(value, "none" | "null") {
                    serde_json::Value::Null
                } else {
                    match existing {
                        serde_json::Value::Bool(_) => serde_json::Value::Bool(
                            value
                                .parse::<bool>()
                                .map_err(|e| invalid(e.to_string()))?,
                        ),
                        serde_json::Value::Number(_) | serde_json::Value::Null => value
                            .parse::<u64>()
                            .map(|n| serde_json::Value::Number(n.into()))
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                        _ => serde_json::Value::String(value.into()),
                    }
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(seconds) = self.timer.custom_seconds {
            if !(MIN_CUSTOM_SECONDS..=MAX_CUSTOM_SECONDS).contains(&seconds) {
                return Err(ConfigError::InvalidValue {
                    key: "timer.custom_seconds".into(),
                    message: format!(
                        "{seconds} is outside {MIN_CUSTOM_SECONDS}..={MAX_CUSTOM_SECONDS}"
                    ),
                });
            }
        }
        if self.session.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "session.tick_interval_ms".into(),
                message: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if it does not exist yet.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

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

    /// Apply a value by dot-separated key without saving.
    ///
    /// `none` clears optional values. On error `self` is unchanged.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and persist. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Store a custom `mm:ss` interval and persist it. A rejected entry
    /// leaves both `self` and the file untouched.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::Duration`] for a bad entry and
    /// [`crate::CoreError::Config`] if the config cannot be saved.
    pub fn save_custom_duration(&mut self, text: &str) -> crate::Result<Option<u32>> {
        let path = Self::path()?;
        self.save_custom_duration_to(text, &path)
    }

    pub fn save_custom_duration_to(
        &mut self,
        text: &str,
        path: &Path,
    ) -> crate::Result<Option<u32>> {
        let seconds = self.timer.apply_custom_input(text)?;
        self.save_to(path)?;
        Ok(seconds)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            warn!(error = %e, "falling back to default config");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::TimerPreset;
    use crate::error::{CoreError, DurationError};

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.timer.preset, Some(TimerPreset::Seconds60));
    }

    #[test]
    fn custom_mode_survives_roundtrip() {
        let mut cfg = Config::default();
        cfg.timer = TimerConfig::custom(Some(75));
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert!(parsed.timer.is_custom());
        assert_eq!(parsed.timer.custom_seconds, Some(75));
    }

    #[test]
    fn missing_sections_use_defaults() {
        let parsed: Config = toml::from_str("[session]\navoid_repeat = false\n").unwrap();
        assert!(!parsed.session.avoid_repeat);
        assert_eq!(parsed.session.tick_interval_ms, 100);
        assert_eq!(parsed.timer, TimerConfig::default());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.preset").as_deref(), Some("60"));
        assert_eq!(cfg.get("session.avoid_repeat").as_deref(), Some("true"));
        assert_eq!(cfg.get("timer.custom_seconds").as_deref(), Some("null"));
        assert!(cfg.get("session.missing_key").is_none());
    }

    #[test]
    fn apply_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.apply("session.avoid_repeat", "false").unwrap();
        cfg.apply("timer.custom_seconds", "90").unwrap();
        cfg.apply("timer.preset", "none").unwrap();
        assert!(!cfg.session.avoid_repeat);
        assert_eq!(cfg.timer.duration_ms(), 90_000);
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("session.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.apply("", "1"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn apply_rejects_invalid_values_without_mutating() {
        let mut cfg = Config::default();
        assert!(cfg.apply("session.avoid_repeat", "not_a_bool").is_err());
        assert!(cfg.apply("timer.preset", "45").is_err());
        assert!(cfg.apply("timer.custom_seconds", "601").is_err());
        assert!(cfg.apply("session.tick_interval_ms", "0").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn load_from_writes_defaults_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        let mut changed = cfg.clone();
        changed.apply("timer.preset", "300").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(
            Config::load_from(&path).unwrap().timer.preset,
            Some(TimerPreset::Minutes5)
        );
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timer]\npreset = \"soon\"\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn save_custom_duration_persists_valid_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();

        assert_eq!(cfg.save_custom_duration_to("4:30", &path).unwrap(), Some(270));
        let loaded = Config::load_from(&path).unwrap();
        assert!(loaded.timer.is_custom());
        assert_eq!(loaded.timer.duration_ms(), 270_000);
    }

    #[test]
    fn save_custom_duration_rejects_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();

        let err = cfg.save_custom_duration_to("12:00", &path).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Duration(DurationError::AboveMaximum { seconds: 720 })
        ));
        assert_eq!(cfg, Config::default());
        assert!(!path.exists());
    }

    #[test]
    fn save_custom_duration_reports_save_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("config.toml");
        let mut cfg = Config::default();

        let err = cfg.save_custom_duration_to("1:00", &path).unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::SaveFailed { .. })));
        assert!(err.to_string().starts_with("Configuration error:"));
    }
}
