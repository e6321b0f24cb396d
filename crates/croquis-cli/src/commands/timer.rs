use clap::Subcommand;
use croquis_core::{format_seconds, Config, TimerConfig, TimerPreset};
use serde::Serialize;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print the active interval as JSON
    Show,
    /// List the fixed presets
    Presets,
    /// Select a fixed preset (30, 60, 120 or 300 seconds)
    Preset {
        /// Preset length in seconds
        seconds: u32,
    },
    /// Switch to custom mode, optionally entering a new mm:ss value
    Custom {
        /// Interval as mm:ss (e.g. 4:30); omit to reuse the stored value
        time: Option<String>,
    },
}

#[derive(Serialize)]
struct TimerView {
    mode: &'static str,
    preset: Option<u32>,
    custom_seconds: Option<u32>,
    duration_ms: u64,
    display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<&'static str>,
}

fn view(timer: &TimerConfig) -> TimerView {
    let duration_ms = timer.duration_ms();
    TimerView {
        mode: if timer.is_custom() { "custom" } else { "preset" },
        preset: timer.preset.map(TimerPreset::seconds),
        custom_seconds: timer.custom_seconds,
        duration_ms,
        display: format_seconds((duration_ms / 1000) as u32),
        label: timer.preset.map(TimerPreset::label),
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;

    match action {
        TimerAction::Show => {}
        TimerAction::Presets => {
            for preset in TimerPreset::ALL {
                println!("{:>4}  {}", preset.label(), preset.seconds());
            }
            return Ok(());
        }
        TimerAction::Preset { seconds } => {
            let preset = TimerPreset::try_from(seconds)?;
            config.timer.select_preset(preset);
            config.save()?;
        }
        TimerAction::Custom { time } => match time {
            // Nothing is stored unless the entry is valid.
            Some(text) => {
                config.save_custom_duration(&text)?;
            }
            None => {
                config.timer.select_custom();
                config.save()?;
            }
        },
    }

    println!("{}", serde_json::to_string_pretty(&view(&config.timer))?);
    Ok(())
}
