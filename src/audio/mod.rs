//! Cue audio: sweep and chime synthesis, the tone cache and playback.
//!
//! The scheduler only sees [`CuePlayer`]. [`AudioSystem`] owns the output
//! stream and hands out a [`CueMixer`] that implements it.

mod cache;
mod export;
mod player;
mod synthesis;
mod system;
mod tones;

// Re-export public types
pub use cache::LruCache;
pub use export::{export_cues, write_wav};
pub use player::{Cue, CuePlayer, SilentPlayer};
pub use synthesis::{generate_success_chime, generate_sweep};
pub use system::{AudioSystem, CueMixer};
pub use tones::{SweepKey, ToneBank};

#[cfg(test)]
pub(crate) use player::testing;
