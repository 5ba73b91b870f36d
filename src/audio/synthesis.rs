//! PCM synthesis of the sweep tones and the success chime.
//!
//! All buffers are mono signed 16-bit at the configured sample rate.

use std::f64::consts::PI;

use crate::params::{chime_constants as chime, ToneConfig, MIN_PHASE_DURATION_S};

/// Linear pitch glide from `start_hz` to `end_hz` with a linear fade at both ends
///
/// The pitch at sample `i` of `n` is interpolated at `i / n` and evaluated
/// against absolute sample time, not integrated into a chirp phase. Returns an
/// empty buffer for durations at or below 0.01 s.
pub fn generate_sweep(start_hz: f64, end_hz: f64, duration_s: f64, config: &ToneConfig) -> Vec<i16> {
    if !duration_s.is_finite() || duration_s <= MIN_PHASE_DURATION_S {
        return Vec::new();
    }

    let sample_rate = config.sample_rate_hz as f64;
    let total = (sample_rate * duration_s).floor() as usize;
    if total == 0 {
        return Vec::new();
    }
    let fade = ((sample_rate * config.fade_s(duration_s)).floor() as usize).max(1) as f64;

    (0..total)
        .map(|i| {
            let t = i as f64 / total as f64;
            let freq = start_hz + (end_hz - start_hz) * t;

            let fade_in = (i as f64 / fade).min(1.0);
            let fade_out = ((total - i) as f64 / fade).min(1.0);
            let envelope = fade_in.min(fade_out);

            let sample = (2.0 * PI * freq * i as f64 / sample_rate).sin();
            quantize(sample * envelope * config.sweep_amplitude)
        })
        .collect()
}

/// Three-note ascending arpeggio with a faint high overlay, soft-clipped
pub fn generate_success_chime(sample_rate_hz: u32) -> Vec<i16> {
    let sample_rate = sample_rate_hz as f64;
    let total = (sample_rate * chime::DURATION_S).floor() as usize;

    (0..total)
        .map(|i| {
            let t = i as f64 / sample_rate;
            let note = note_at(t);
            let start = chime::NOTE_STARTS_S[note];
            let length = chime::NOTE_DURATIONS_S[note];
            let freq = chime::NOTES_HZ[note];

            let local_t = t - start;
            let x = (local_t / length).clamp(0.0, 1.0);
            let attack = (0.5 * PI * (x / chime::ATTACK_FRACTION).min(1.0)).sin();
            let release = (0.5 * PI * ((1.0 - x) / chime::RELEASE_FRACTION).min(1.0)).sin();
            let envelope = attack.min(release);

            let tone = chime::FUNDAMENTAL_WEIGHT * (2.0 * PI * freq * local_t).sin()
                + chime::HARMONIC_WEIGHT * (2.0 * PI * 2.0 * freq * local_t).sin();

            let sparkle: f64 = chime::SPARKLE_HZ
                .iter()
                .map(|hz| chime::SPARKLE_WEIGHT * (2.0 * PI * hz * t).sin())
                .sum();

            let mixed = tone * envelope * chime::NOTE_GAIN + sparkle;
            quantize(soft_clip(mixed))
        })
        .collect()
}

/// Index of the note sounding at `t` seconds
fn note_at(t: f64) -> usize {
    chime::NOTE_STARTS_S
        .iter()
        .rposition(|&start| t >= start)
        .unwrap_or(0)
}

fn soft_clip(x: f64) -> f64 {
    (chime::SOFT_CLIP_DRIVE * x).tanh() / chime::SOFT_CLIP_DRIVE
}

/// Scale [-1, 1] to 16-bit, truncating toward zero
fn quantize(sample: f64) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f64) as i16
}
