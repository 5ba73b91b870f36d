//! Key/value settings store producing session configuration snapshots.
//!
//! Values are kept as integer tenths (seconds for phases, minutes for the
//! countdown) under fixed string keys. Anything missing reads as its default.

use std::collections::BTreeMap;

use log::warn;

use crate::error::ConfigError;
use crate::params::{check_non_negative, round_to_half, Preset, SessionConfig};

/// Numeric setting edited by a half-step slider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationField {
    Inhale,
    Hold,
    Exhale,
    Rest,

    /// Session length in minutes
    Countdown,
}

impl DurationField {
    pub const ALL: [DurationField; 5] = [
        DurationField::Inhale,
        DurationField::Hold,
        DurationField::Exhale,
        DurationField::Rest,
        DurationField::Countdown,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DurationField::Inhale => "inhale",
            DurationField::Hold => "hold",
            DurationField::Exhale => "exhale",
            DurationField::Rest => "rest",
            DurationField::Countdown => "countdown",
        }
    }

    /// Storage key
    pub fn key(self) -> &'static str {
        match self {
            DurationField::Inhale => "inhale_tenths",
            DurationField::Hold => "hold_tenths",
            DurationField::Exhale => "exhale_tenths",
            DurationField::Rest => "rest_tenths",
            DurationField::Countdown => "countdown_tenths",
        }
    }

    /// Largest value the slider allows (seconds, or minutes for the countdown)
    pub fn max_value(self) -> f64 {
        match self {
            DurationField::Countdown => 15.0,
            _ => 10.0,
        }
    }

    fn default_value(self) -> f64 {
        let defaults = SessionConfig::default();
        match self {
            DurationField::Inhale => defaults.inhale_s,
            DurationField::Hold => defaults.hold_s,
            DurationField::Exhale => defaults.exhale_s,
            DurationField::Rest => defaults.rest_s,
            DurationField::Countdown => defaults.countdown_minutes(),
        }
    }
}

/// Addressable setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    Duration(DurationField),
    SoundEnabled,
}

impl SettingKey {
    pub fn key(self) -> &'static str {
        match self {
            SettingKey::Duration(field) => field.key(),
            SettingKey::SoundEnabled => "sound_enabled",
        }
    }
}

/// Stored representation of a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingValue {
    Tenths(i64),
    Flag(bool),
}

/// Write side of a settings backend
pub trait SettingsSink {
    fn write(&mut self, key: SettingKey, value: SettingValue);
}

/// In-memory settings backend
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsStore {
    values: BTreeMap<&'static str, SettingValue>,
}

impl SettingsSink for SettingsStore {
    fn write(&mut self, key: SettingKey, value: SettingValue) {
        self.values.insert(key.key(), value);
    }
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored value, if any
    pub fn get(&self, key: SettingKey) -> Option<SettingValue> {
        self.values.get(key.key()).copied()
    }

    /// Field value in its own unit (seconds, or minutes for the countdown)
    pub fn value(&self, field: DurationField) -> f64 {
        match self.get(SettingKey::Duration(field)) {
            Some(SettingValue::Tenths(tenths)) => tenths as f64 / 10.0,
            _ => field.default_value(),
        }
    }

    pub fn sound_enabled(&self) -> bool {
        match self.get(SettingKey::SoundEnabled) {
            Some(SettingValue::Flag(enabled)) => enabled,
            _ => SessionConfig::default().sound_enabled,
        }
    }

    /// Snapshot for the scheduler
    pub fn config(&self) -> SessionConfig {
        SessionConfig {
            inhale_s: self.value(DurationField::Inhale),
            hold_s: self.value(DurationField::Hold),
            exhale_s: self.value(DurationField::Exhale),
            rest_s: self.value(DurationField::Rest),
            countdown_s: self.value(DurationField::Countdown) * 60.0,
            sound_enabled: self.sound_enabled(),
        }
        .sanitized()
    }

    /// Store a slider value: rounded to the nearest half and clamped to the
    /// slider range. Returns the stored value.
    pub fn set_duration(&mut self, field: DurationField, value: f64) -> Result<f64, ConfigError> {
        check_non_negative(field.name(), value)?;
        let rounded = round_to_half(value);
        let stored = rounded.min(field.max_value());
        if stored < rounded {
            warn!(
                "{} = {} is above the maximum, using {}",
                field.name(),
                value,
                stored
            );
        }
        write_tenths(self, field, stored);
        Ok(stored)
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.write(SettingKey::SoundEnabled, SettingValue::Flag(enabled));
    }

    /// Overwrite the four phase durations; countdown and sound are kept
    pub fn apply_preset(&mut self, preset: &Preset) {
        let durations = [
            (DurationField::Inhale, preset.inhale_s),
            (DurationField::Hold, preset.hold_s),
            (DurationField::Exhale, preset.exhale_s),
            (DurationField::Rest, preset.rest_s),
        ];
        for (field, value) in durations {
            write_tenths(self, field, value);
        }
    }

    /// Restore default durations and countdown; the sound flag is kept
    pub fn reset_to_defaults(&mut self) {
        for field in DurationField::ALL {
            write_tenths(self, field, field.default_value());
        }
    }
}

/// Persist `value` as truncated tenths
fn write_tenths(sink: &mut impl SettingsSink, field: DurationField, value: f64) {
    sink.write(
        SettingKey::Duration(field),
        SettingValue::Tenths((value * 10.0) as i64),
    );
}
