//! Cue buffers: cached sweeps keyed by rounded duration, plus the uncached chime.

use std::sync::Arc;

use log::{debug, trace};

use super::cache::LruCache;
use super::player::Cue;
use super::synthesis::{generate_success_chime, generate_sweep};
use crate::error::ConfigError;
use crate::params::{round_to_half, ToneConfig, MIN_PHASE_DURATION_S};

/// Cache key in integer units: tenths of Hz and half seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SweepKey {
    start_dhz: i64,
    end_dhz: i64,
    half_seconds: i64,
}

impl SweepKey {
    pub fn new(start_hz: f64, end_hz: f64, duration_s: f64) -> Self {
        Self {
            start_dhz: (start_hz * 10.0).round() as i64,
            end_dhz: (end_hz * 10.0).round() as i64,
            half_seconds: (round_to_half(duration_s) * 2.0) as i64,
        }
    }

    /// Duration the buffer is synthesized at
    pub fn duration_s(&self) -> f64 {
        self.half_seconds as f64 / 2.0
    }
}

/// Synthesizes cue buffers and keeps recent sweeps
#[derive(Debug)]
pub struct ToneBank {
    config: ToneConfig,
    sweeps: LruCache<SweepKey, Arc<[i16]>>,
}

impl ToneBank {
    pub fn new(config: ToneConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let sweeps = LruCache::new(config.cache_capacity);
        Ok(Self { config, sweeps })
    }

    pub fn config(&self) -> &ToneConfig {
        &self.config
    }

    pub fn cached_sweeps(&self) -> usize {
        self.sweeps.len()
    }

    /// Sweep buffer for the rounded duration, synthesized on a miss
    ///
    /// Returns `None` when the rounded duration is too short to be audible.
    pub fn sweep(&mut self, start_hz: f64, end_hz: f64, duration_s: f64) -> Option<Arc<[i16]>> {
        if !duration_s.is_finite() {
            return None;
        }
        let key = SweepKey::new(start_hz, end_hz, duration_s);
        let rounded = key.duration_s();
        if rounded <= MIN_PHASE_DURATION_S {
            return None;
        }

        if let Some(buffer) = self.sweeps.get(&key) {
            trace!("Tone cache hit: {:?}", key);
            return Some(Arc::clone(buffer));
        }

        let buffer: Arc<[i16]> = generate_sweep(start_hz, end_hz, rounded, &self.config).into();
        debug!(
            "Synthesized sweep {:.1}->{:.1} Hz over {:.1}s ({} samples)",
            start_hz,
            end_hz,
            rounded,
            buffer.len()
        );
        if let Some((evicted, _)) = self.sweeps.insert(key, Arc::clone(&buffer)) {
            trace!("Tone cache evicted {:?}", evicted);
        }
        Some(buffer)
    }

    /// Buffer for a cue, or `None` when nothing should sound
    pub fn buffer_for(&mut self, cue: Cue) -> Option<Arc<[i16]>> {
        match cue {
            Cue::Inhale { duration_s } => {
                let (start, end) = self.config.inhale_sweep_hz;
                self.sweep(start, end, duration_s)
            }
            Cue::Exhale { duration_s } => {
                let (start, end) = self.config.exhale_sweep_hz;
                self.sweep(start, end, duration_s)
            }
            Cue::Success => Some(self.success()),
        }
    }

    /// Chime buffer, regenerated on every call
    pub fn success(&self) -> Arc<[i16]> {
        generate_success_chime(self.config.sample_rate_hz).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> ToneBank {
        ToneBank::new(ToneConfig::default()).unwrap()
    }

    #[test]
    fn test_key_uses_half_second_buckets() {
        assert_eq!(SweepKey::new(220.0, 278.0, 4.2), SweepKey::new(220.0, 278.0, 4.0));
        assert_eq!(SweepKey::new(220.0, 278.0, 4.3).duration_s(), 4.5);
        assert_ne!(SweepKey::new(220.0, 278.0, 4.0), SweepKey::new(278.0, 220.0, 4.0));
    }

    #[test]
    fn test_nearby_durations_share_buffer() {
        let mut bank = bank();
        let a = bank.sweep(220.0, 278.0, 4.0).unwrap();
        let b = bank.sweep(220.0, 278.0, 4.2).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(bank.cached_sweeps(), 1);

        // Synthesized at the rounded duration, so a fresh buffer matches the cached one
        let fresh = generate_sweep(220.0, 278.0, 4.0, bank.config());
        assert_eq!(&a[..], &fresh[..]);
    }

    #[test]
    fn test_thirteenth_key_evicts_least_recent() {
        let mut bank = bank();
        for i in 1..=12 {
            bank.sweep(220.0, 278.0, i as f64 * 0.5).unwrap();
        }
        assert_eq!(bank.cached_sweeps(), 12);

        // Touch the oldest so the second-oldest becomes the victim
        let first = bank.sweep(220.0, 278.0, 0.5).unwrap();
        bank.sweep(220.0, 278.0, 6.5).unwrap();

        assert_eq!(bank.cached_sweeps(), 12);
        assert!(bank.sweeps.contains(&SweepKey::new(220.0, 278.0, 0.5)));
        assert!(!bank.sweeps.contains(&SweepKey::new(220.0, 278.0, 1.0)));
        assert!(Arc::ptr_eq(&first, &bank.sweep(220.0, 278.0, 0.5).unwrap()));
    }

    #[test]
    fn test_direction_is_part_of_key() {
        let mut bank = bank();
        let up = bank.buffer_for(Cue::Inhale { duration_s: 4.0 }).unwrap();
        let down = bank.buffer_for(Cue::Exhale { duration_s: 4.0 }).unwrap();
        assert!(!Arc::ptr_eq(&up, &down));
        assert_eq!(bank.cached_sweeps(), 2);
    }

    #[test]
    fn test_short_durations_yield_nothing() {
        let mut bank = bank();
        assert!(bank.sweep(220.0, 278.0, 0.2).is_none());
        assert!(bank.sweep(220.0, 278.0, f64::INFINITY).is_none());
        assert_eq!(bank.cached_sweeps(), 0);
    }

    #[test]
    fn test_success_is_not_cached_as_sweep() {
        let mut bank = bank();
        let chime = bank.buffer_for(Cue::Success).unwrap();
        assert_eq!(chime.len(), 16_758);
        assert_eq!(bank.cached_sweeps(), 0);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = ToneConfig {
            cache_capacity: 0,
            ..ToneConfig::default()
        };
        assert_eq!(ToneBank::new(config).unwrap_err(), ConfigError::ZeroCacheCapacity);
    }
}
