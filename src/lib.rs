//! pacedbreath library - Paced breathing scheduler with synthesized audio cues

pub mod audio;
pub mod cli;
pub mod error;
pub mod params;
pub mod session;
pub mod settings;

mod sync;
