//! Tone synthesis configuration and chime constants.

use crate::error::ConfigError;

/// Sweep tone synthesis and cache configuration
#[derive(Debug, Clone)]
pub struct ToneConfig {
    /// PCM sample rate of synthesized cues (Hz)
    pub sample_rate_hz: u32,

    /// Peak amplitude of sweep tones (fraction of 16-bit full scale)
    pub sweep_amplitude: f64,

    /// Longest fade-in/fade-out ramp (seconds)
    pub max_fade_s: f64,

    /// Fade length as a fraction of the sweep, when shorter than `max_fade_s`
    pub fade_fraction: f64,

    /// Inhale sweep (start Hz, end Hz), rising
    pub inhale_sweep_hz: (f64, f64),

    /// Exhale sweep (start Hz, end Hz), falling
    pub exhale_sweep_hz: (f64, f64),

    /// Maximum cached sweep buffers (least-recently-used eviction)
    pub cache_capacity: usize,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44_100,
            sweep_amplitude: 0.18,
            max_fade_s: 0.2,
            fade_fraction: 0.2,
            inhale_sweep_hz: (220.0, 278.0),
            exhale_sweep_hz: (278.0, 220.0),
            cache_capacity: 12,
        }
    }
}

impl ToneConfig {
    /// Validate configuration (sample rate and cache capacity non-zero)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate_hz == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.cache_capacity == 0 {
            return Err(ConfigError::ZeroCacheCapacity);
        }
        Ok(())
    }

    /// Fade ramp length for a sweep of the given duration (seconds)
    pub fn fade_s(&self, duration_s: f64) -> f64 {
        self.max_fade_s.min(duration_s * self.fade_fraction)
    }
}

/// Success chime constants (fixed three-note arpeggio, G4 B4 D5)
pub mod chime_constants {
    /// Total chime length (seconds)
    pub const DURATION_S: f64 = 0.38;

    /// Note fundamentals (Hz)
    pub const NOTES_HZ: [f64; 3] = [392.00, 493.88, 587.33];

    /// Note start times (seconds)
    pub const NOTE_STARTS_S: [f64; 3] = [0.00, 0.11, 0.22];

    /// Note lengths (seconds)
    pub const NOTE_DURATIONS_S: [f64; 3] = [0.11, 0.11, 0.16];

    /// Mix weights of fundamental and second harmonic
    pub const FUNDAMENTAL_WEIGHT: f64 = 0.85;
    pub const HARMONIC_WEIGHT: f64 = 0.15;

    /// Gain applied to the enveloped note
    pub const NOTE_GAIN: f64 = 0.22;

    /// Envelope attack/release as fractions of the note's local time
    pub const ATTACK_FRACTION: f64 = 0.15;
    pub const RELEASE_FRACTION: f64 = 0.35;

    /// Unenveloped overlay partials (Hz) and their weight
    pub const SPARKLE_HZ: [f64; 2] = [1568.0, 1976.0];
    pub const SPARKLE_WEIGHT: f64 = 0.02;

    /// Soft clip: tanh(drive * x) / drive
    pub const SOFT_CLIP_DRIVE: f64 = 1.3;
}
