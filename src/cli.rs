//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::error::ConfigError;
use crate::params::{find_preset, SessionConfig, TickConfig};
use crate::settings::{DurationField, SettingsStore};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "pacedbreath")]
#[command(about = "Paced breathing timer with audio cues", long_about = None)]
pub struct Args {
    /// Inhale duration (seconds, default 4)
    #[arg(long, value_name = "SECONDS")]
    pub inhale: Option<f64>,

    /// Hold after inhale (seconds, default 2)
    #[arg(long, value_name = "SECONDS")]
    pub hold: Option<f64>,

    /// Exhale duration (seconds, default 6)
    #[arg(long, value_name = "SECONDS")]
    pub exhale: Option<f64>,

    /// Rest after exhale (seconds, default 0)
    #[arg(long, value_name = "SECONDS")]
    pub rest: Option<f64>,

    /// Session length, 0 for unlimited (minutes, default 5)
    #[arg(long, value_name = "MINUTES")]
    pub minutes: Option<f64>,

    /// Start from a named preset: "5.5 - 0 - 5.5 - 0" or "4 - 0 - 6 - 0"
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Disable audio cues
    #[arg(long)]
    pub mute: bool,

    /// Scheduler tick interval (milliseconds)
    #[arg(long, value_name = "MS", default_value = "50")]
    pub tick_ms: u64,

    /// Write inhale/exhale/success WAV files to DIR and exit
    #[arg(long, value_name = "DIR")]
    pub export: Option<PathBuf>,
}

impl Args {
    /// Build the session configuration: defaults, then the preset, then explicit flags
    pub fn session_config(&self) -> Result<SessionConfig, ConfigError> {
        let mut store = SettingsStore::new();
        if let Some(name) = &self.preset {
            store.apply_preset(find_preset(name)?);
        }

        let overrides = [
            (DurationField::Inhale, self.inhale),
            (DurationField::Hold, self.hold),
            (DurationField::Exhale, self.exhale),
            (DurationField::Rest, self.rest),
            (DurationField::Countdown, self.minutes),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                store.set_duration(field, value)?;
            }
        }
        if self.mute {
            store.set_sound_enabled(false);
        }

        let config = store.config();
        config.validate()?;
        Ok(config)
    }

    pub fn tick_config(&self) -> TickConfig {
        TickConfig {
            interval_ms: self.tick_ms,
        }
    }
}
