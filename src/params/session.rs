//! Session timing parameters: phase durations, countdown, presets and tick cadence.

use crate::error::ConfigError;

/// Phases at or below this duration are skipped (seconds)
pub const MIN_PHASE_DURATION_S: f64 = 0.01;

/// Session timing and cue configuration
///
/// Built by the settings boundary, which clamps or rejects bad values; the
/// scheduler trusts it as given.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Inhale duration (seconds)
    pub inhale_s: f64,

    /// Hold-after-inhale duration (seconds)
    pub hold_s: f64,

    /// Exhale duration (seconds)
    pub exhale_s: f64,

    /// Rest-after-exhale duration (seconds)
    pub rest_s: f64,

    /// Overall session budget (seconds, 0 = unlimited)
    pub countdown_s: f64,

    /// Play inhale/exhale sweeps and the success chime
    pub sound_enabled: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inhale_s: 4.0,
            hold_s: 2.0,
            exhale_s: 6.0,
            rest_s: 0.0,
            countdown_s: 5.0 * 60.0, // 5 minute session
            sound_enabled: true,
        }
    }
}

impl SessionConfig {
    /// Phase durations in cycle order (inhale, hold, exhale, rest)
    pub fn durations(&self) -> [f64; 4] {
        [self.inhale_s, self.hold_s, self.exhale_s, self.rest_s]
    }

    /// Countdown length in minutes
    pub fn countdown_minutes(&self) -> f64 {
        self.countdown_s / 60.0
    }

    /// Whether the session has a finite time budget
    pub fn countdown_active(&self) -> bool {
        self.countdown_s > MIN_PHASE_DURATION_S
    }

    /// True when phase durations and countdown match (sound flag ignored)
    pub fn same_timing(&self, other: &SessionConfig) -> bool {
        self.durations() == other.durations() && self.countdown_s == other.countdown_s
    }

    /// Replace the four phase durations with a preset's
    pub fn with_preset(mut self, preset: &Preset) -> Self {
        self.inhale_s = preset.inhale_s;
        self.hold_s = preset.hold_s;
        self.exhale_s = preset.exhale_s;
        self.rest_s = preset.rest_s;
        self
    }

    /// Clamp negative or non-finite values to zero
    pub fn sanitized(mut self) -> Self {
        for value in [
            &mut self.inhale_s,
            &mut self.hold_s,
            &mut self.exhale_s,
            &mut self.rest_s,
            &mut self.countdown_s,
        ] {
            if !value.is_finite() || *value < 0.0 {
                *value = 0.0;
            }
        }
        self
    }

    /// Validate configuration (durations finite and non-negative)
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("inhale", self.inhale_s),
            ("hold", self.hold_s),
            ("exhale", self.exhale_s),
            ("rest", self.rest_s),
            ("countdown", self.countdown_s),
        ];
        for (field, value) in fields {
            check_non_negative(field, value)?;
        }
        Ok(())
    }
}

/// Reject NaN, infinities and negative numbers for a named field
pub fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

/// Round to the nearest half second, ties to even (4.25 -> 4.0, 4.75 -> 5.0)
pub fn round_to_half(value: f64) -> f64 {
    (value * 2.0).round_ties_even() / 2.0
}

/// Named set of phase durations
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    pub inhale_s: f64,
    pub hold_s: f64,
    pub exhale_s: f64,
    pub rest_s: f64,
}

/// Built-in presets offered by the preset picker
pub const PRESETS: &[Preset] = &[
    Preset {
        name: "5.5 - 0 - 5.5 - 0",
        inhale_s: 5.5,
        hold_s: 0.0,
        exhale_s: 5.5,
        rest_s: 0.0,
    },
    Preset {
        name: "4 - 0 - 6 - 0",
        inhale_s: 4.0,
        hold_s: 0.0,
        exhale_s: 6.0,
        rest_s: 0.0,
    },
];

/// Look up a built-in preset by name (case-insensitive)
pub fn find_preset(name: &str) -> Result<&'static Preset, ConfigError> {
    let wanted = name.trim();
    PRESETS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))
}

/// Scheduler polling cadence
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Wall-clock interval between ticks (milliseconds)
    /// 50 ms bounds phase-boundary latency to ~1/20 s
    pub interval_ms: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self { interval_ms: 50 }
    }
}

impl TickConfig {
    /// Validate configuration (interval must be non-zero)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session_matches_app_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.durations(), [4.0, 2.0, 6.0, 0.0]);
        assert_eq!(config.countdown_minutes(), 5.0);
        assert!(config.sound_enabled);
        assert!(config.countdown_active());
    }

    #[test]
    fn test_sanitized_clamps_negative_and_nan() {
        let config = SessionConfig {
            inhale_s: -3.0,
            hold_s: f64::NAN,
            exhale_s: 6.0,
            rest_s: f64::INFINITY,
            countdown_s: -1.0,
            sound_enabled: false,
        }
        .sanitized();

        assert_eq!(config.durations(), [0.0, 0.0, 6.0, 0.0]);
        assert_eq!(config.countdown_s, 0.0);
        assert!(!config.countdown_active());
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let mut config = SessionConfig::default();
        assert!(config.validate().is_ok());

        config.exhale_s = -0.5;
        assert_eq!(
            config.validate(),
            Err(ConfigError::Negative {
                field: "exhale",
                value: -0.5
            })
        );

        config.exhale_s = 6.0;
        config.countdown_s = f64::NAN;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotFinite { field: "countdown" })
        );
    }

    #[test]
    fn test_same_timing_ignores_sound_flag() {
        let a = SessionConfig::default();
        let mut b = a.clone();
        b.sound_enabled = false;
        assert!(a.same_timing(&b));

        b.rest_s = 1.0;
        assert!(!a.same_timing(&b));
    }

    #[test]
    fn test_find_preset_case_insensitive() {
        let preset = find_preset(" 4 - 0 - 6 - 0 ").unwrap();
        assert_eq!(preset.exhale_s, 6.0);

        let config = SessionConfig::default().with_preset(preset);
        assert_eq!(config.durations(), [4.0, 0.0, 6.0, 0.0]);
        assert_eq!(config.countdown_s, 300.0); // countdown untouched

        assert_eq!(
            find_preset("box"),
            Err(ConfigError::UnknownPreset("box".to_string()))
        );
    }

    #[test]
    fn test_round_to_half() {
        assert_eq!(round_to_half(4.0), 4.0);
        assert_eq!(round_to_half(4.2), 4.0);
        assert_eq!(round_to_half(4.3), 4.5);
        assert_eq!(round_to_half(4.25), 4.0);
        assert_eq!(round_to_half(4.75), 5.0);
        assert_eq!(round_to_half(0.2), 0.0);
    }

    #[test]
    fn test_tick_config_validation() {
        assert!(TickConfig::default().validate().is_ok());
        assert_eq!(
            TickConfig { interval_ms: 0 }.validate(),
            Err(ConfigError::ZeroTickInterval)
        );
    }
}
