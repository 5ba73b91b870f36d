//! Cue playback port used by the scheduler.

use crate::session::{Phase, PhaseKind};

/// Audible cue requested by the scheduler
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cue {
    /// Rising sweep lasting the inhale phase
    Inhale { duration_s: f64 },

    /// Falling sweep lasting the exhale phase
    Exhale { duration_s: f64 },

    /// Three-note chime when a timed session completes
    Success,
}

impl Cue {
    /// Cue that accompanies entering `phase` (Hold and Rest are silent)
    pub fn for_phase(phase: &Phase) -> Option<Cue> {
        if phase.is_skipped() {
            return None;
        }
        match phase.kind {
            PhaseKind::Inhale => Some(Cue::Inhale {
                duration_s: phase.duration_s,
            }),
            PhaseKind::Exhale => Some(Cue::Exhale {
                duration_s: phase.duration_s,
            }),
            PhaseKind::Hold | PhaseKind::Rest => None,
        }
    }
}

/// Playback sink for cues
///
/// Implementations never fail outward: a cue that cannot be played is
/// dropped (and logged) so the phase timer keeps running.
pub trait CuePlayer: Send + Sync {
    /// Start a cue. A sweep replaces any sweep already playing; the chime
    /// plays on its own channel.
    fn play(&self, cue: Cue);

    /// Silence every channel before returning
    fn stop(&self);
}

/// Player used when sound is disabled or no output device is available
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentPlayer;

impl CuePlayer for SilentPlayer {
    fn play(&self, _cue: Cue) {}

    fn stop(&self) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::{Cue, CuePlayer};
    use crate::sync::lock;

    /// Call observed by [`RecordingPlayer`]
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum PlayerCall {
        Play(Cue),
        Stop,
    }

    /// Records every call for assertions
    #[derive(Debug, Default)]
    pub struct RecordingPlayer {
        calls: Mutex<Vec<PlayerCall>>,
    }

    impl RecordingPlayer {
        pub fn calls(&self) -> Vec<PlayerCall> {
            lock(&self.calls).clone()
        }

        pub fn played(&self) -> Vec<Cue> {
            self.calls()
                .into_iter()
                .filter_map(|call| match call {
                    PlayerCall::Play(cue) => Some(cue),
                    PlayerCall::Stop => None,
                })
                .collect()
        }

        pub fn success_count(&self) -> usize {
            self.played()
                .iter()
                .filter(|cue| **cue == Cue::Success)
                .count()
        }

        pub fn clear(&self) {
            lock(&self.calls).clear();
        }
    }

    impl CuePlayer for RecordingPlayer {
        fn play(&self, cue: Cue) {
            lock(&self.calls).push(PlayerCall::Play(cue));
        }

        fn stop(&self) {
            lock(&self.calls).push(PlayerCall::Stop);
        }
    }
}
