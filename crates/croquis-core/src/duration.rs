//! Interval configuration: fixed presets, custom `mm:ss` entry, and the
//! resolver that turns either into a duration in milliseconds.

use serde::{Deserialize, Serialize};

use crate::error::DurationError;

/// Smallest custom interval a user may enter.
pub const MIN_CUSTOM_SECONDS: u32 = 1;
/// Largest custom interval a user may enter (10 minutes).
pub const MAX_CUSTOM_SECONDS: u32 = 600;
/// Interval used when custom mode has no usable value.
pub const DEFAULT_DURATION_SECONDS: u32 = 60;

/// Fixed interval choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum TimerPreset {
    Seconds30,
    Seconds60,
    Minutes2,
    Minutes5,
}

impl TimerPreset {
    pub const ALL: [TimerPreset; 4] = [
        TimerPreset::Seconds30,
        TimerPreset::Seconds60,
        TimerPreset::Minutes2,
        TimerPreset::Minutes5,
    ];

    pub fn seconds(self) -> u32 {
        match self {
            TimerPreset::Seconds30 => 30,
            TimerPreset::Seconds60 => 60,
            TimerPreset::Minutes2 => 120,
            TimerPreset::Minutes5 => 300,
        }
    }

    /// Short label for pickers ("30s", "1m", ...).
    pub fn label(self) -> &'static str {
        match self {
            TimerPreset::Seconds30 => "30s",
            TimerPreset::Seconds60 => "1m",
            TimerPreset::Minutes2 => "2m",
            TimerPreset::Minutes5 => "5m",
        }
    }

    pub fn from_seconds(seconds: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.seconds() == seconds)
    }
}

impl TryFrom<u32> for TimerPreset {
    type Error = String;

    fn try_from(seconds: u32) -> Result<Self, Self::Error> {
        Self::from_seconds(seconds).ok_or_else(|| {
            format!("{seconds}s is not a preset (expected one of 30, 60, 120, 300)")
        })
    }
}

impl From<TimerPreset> for u32 {
    fn from(preset: TimerPreset) -> Self {
        preset.seconds()
    }
}

/// Timer configuration.
///
/// Preset mode when `preset` is set, custom mode otherwise. Switching modes
/// never discards the stored custom value, so returning to custom mode
/// restores what the user typed last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Absent in serialized custom-mode configs, so it must default to `None`.
    #[serde(default)]
    pub preset: Option<TimerPreset>,
    #[serde(default)]
    pub custom_seconds: Option<u32>,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            preset: Some(TimerPreset::Seconds60),
            custom_seconds: None,
        }
    }
}

impl TimerConfig {
    pub fn preset(preset: TimerPreset) -> Self {
        Self {
            preset: Some(preset),
            custom_seconds: None,
        }
    }

    pub fn custom(seconds: Option<u32>) -> Self {
        Self {
            preset: None,
            custom_seconds: seconds,
        }
    }

    pub fn is_custom(&self) -> bool {
        self.preset.is_none()
    }

    pub fn select_preset(&mut self, preset: TimerPreset) {
        self.preset = Some(preset);
    }

    pub fn select_custom(&mut self) {
        self.preset = None;
    }

    /// Validate user text and, only if valid, switch to custom mode with it.
    ///
    /// Empty input clears the custom value. On error the config is untouched.
    pub fn apply_custom_input(&mut self, text: &str) -> Result<Option<u32>, DurationError> {
        let seconds = if text.trim().is_empty() {
            None
        } else {
            Some(parse_custom_duration(text)?)
        };
        self.preset = None;
        self.custom_seconds = seconds;
        Ok(seconds)
    }

    pub fn duration_ms(&self) -> u64 {
        resolve_duration_ms(self)
    }
}

/// Resolve the active interval length in milliseconds.
///
/// A preset always wins over a stored custom value. In custom mode an absent
/// or out-of-range value falls back to [`DEFAULT_DURATION_SECONDS`].
pub fn resolve_duration_ms(config: &TimerConfig) -> u64 {
    let seconds = match config.preset {
        Some(preset) => preset.seconds(),
        None => config
            .custom_seconds
            .filter(|s| (MIN_CUSTOM_SECONDS..=MAX_CUSTOM_SECONDS).contains(s))
            .unwrap_or(DEFAULT_DURATION_SECONDS),
    };
    u64::from(seconds) * 1000
}

/// Parse `m:ss` / `mm:ss` text into seconds, enforcing the custom bounds.
pub fn parse_custom_duration(text: &str) -> Result<u32, DurationError> {
    let trimmed = text.trim();
    let invalid = || DurationError::InvalidFormat(trimmed.to_string());

    let (minutes, seconds) = trimmed.split_once(':').ok_or_else(invalid)?;
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(minutes) || minutes.len() > 3 || seconds.len() != 2 || !all_digits(seconds) {
        return Err(invalid());
    }

    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    let seconds: u32 = seconds.parse().map_err(|_| invalid())?;
    if seconds > 59 {
        return Err(invalid());
    }

    let total = minutes * 60 + seconds;
    if total < MIN_CUSTOM_SECONDS {
        return Err(DurationError::BelowMinimum { seconds: total });
    }
    if total > MAX_CUSTOM_SECONDS {
        return Err(DurationError::AboveMaximum { seconds: total });
    }
    Ok(total)
}

/// Render seconds as `m:ss`.
pub fn format_seconds(total: u32) -> String {
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_wins_over_custom_value() {
        let config = TimerConfig {
            preset: Some(TimerPreset::Seconds30),
            custom_seconds: Some(999),
        };
        assert_eq!(resolve_duration_ms(&config), 30_000);
    }

    #[test]
    fn every_preset_resolves_to_its_seconds() {
        for preset in TimerPreset::ALL {
            let config = TimerConfig::preset(preset);
            assert_eq!(config.duration_ms(), u64::from(preset.seconds()) * 1000);
        }
    }

    #[test]
    fn custom_value_used_in_custom_mode() {
        assert_eq!(resolve_duration_ms(&TimerConfig::custom(Some(45))), 45_000);
    }

    #[test]
    fn custom_mode_without_value_uses_default() {
        assert_eq!(resolve_duration_ms(&TimerConfig::custom(None)), 60_000);
    }

    #[test]
    fn out_of_range_custom_value_uses_default() {
        assert_eq!(resolve_duration_ms(&TimerConfig::custom(Some(0))), 60_000);
        assert_eq!(resolve_duration_ms(&TimerConfig::custom(Some(601))), 60_000);
        assert_eq!(resolve_duration_ms(&TimerConfig::custom(Some(600))), 600_000);
    }

    #[test]
    fn parse_accepts_minutes_and_seconds() {
        assert_eq!(parse_custom_duration("4:30"), Ok(270));
        assert_eq!(parse_custom_duration(" 0:45 "), Ok(45));
        assert_eq!(parse_custom_duration("10:00"), Ok(600));
        assert_eq!(parse_custom_duration("00:01"), Ok(1));
    }

    #[test]
    fn parse_rejects_malformed_text() {
        for text in ["", "45", "4:3", "4:300", "a:30", "4:6x", ":30", "4:60", "1:2:3", "-1:00"] {
            assert!(
                matches!(parse_custom_duration(text), Err(DurationError::InvalidFormat(_))),
                "expected InvalidFormat for {text:?}"
            );
        }
    }

    #[test]
    fn parse_enforces_bounds() {
        assert_eq!(
            parse_custom_duration("0:00"),
            Err(DurationError::BelowMinimum { seconds: 0 })
        );
        assert_eq!(
            parse_custom_duration("10:01"),
            Err(DurationError::AboveMaximum { seconds: 601 })
        );
    }

    #[test]
    fn invalid_entry_leaves_config_untouched() {
        let mut config = TimerConfig::preset(TimerPreset::Minutes2);
        config.custom_seconds = Some(90);
        assert!(config.apply_custom_input("99:99").is_err());
        assert_eq!(config.preset, Some(TimerPreset::Minutes2));
        assert_eq!(config.custom_seconds, Some(90));
    }

    #[test]
    fn valid_entry_switches_to_custom_mode() {
        let mut config = TimerConfig::default();
        assert_eq!(config.apply_custom_input("1:15"), Ok(Some(75)));
        assert!(config.is_custom());
        assert_eq!(config.duration_ms(), 75_000);
    }

    #[test]
    fn switching_modes_preserves_custom_value() {
        let mut config = TimerConfig::custom(Some(75));
        config.select_preset(TimerPreset::Seconds30);
        assert_eq!(config.duration_ms(), 30_000);
        config.select_custom();
        assert_eq!(config.duration_ms(), 75_000);
    }

    #[test]
    fn format_is_inverse_of_parse() {
        assert_eq!(format_seconds(270), "4:30");
        assert_eq!(format_seconds(5), "0:05");
        assert_eq!(parse_custom_duration(&format_seconds(600)), Ok(600));
    }

    #[test]
    fn preset_serializes_as_seconds() {
        let json = serde_json::to_string(&TimerConfig::preset(TimerPreset::Minutes5)).unwrap();
        assert!(json.contains("\"preset\":300"));
        let bad: Result<TimerConfig, _> = serde_json::from_str(r#"{"preset":45}"#);
        assert!(bad.is_err());
    }
}
