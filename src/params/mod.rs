//! Parameter definitions with physical units and documented semantics.
//!
//! All tuning numbers live here with:
//! - Physical units (seconds, Hz, milliseconds)
//! - Documented ranges and meanings
//! - `validate()` at the boundary that builds them

mod audio;
mod session;

// Re-export all types
pub use audio::{chime_constants, ToneConfig};
pub use session::{
    check_non_negative, find_preset, round_to_half, Preset, SessionConfig, TickConfig,
    MIN_PHASE_DURATION_S, PRESETS,
};
