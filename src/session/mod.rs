//! Breathing session timing.
//!
//! Splits the session into the phase model, the tick-driven scheduler, the
//! immutable snapshots it publishes and the thread that runs it.

mod phase;
mod runner;
mod scheduler;
mod snapshot;

// Re-export public types
pub use phase::{ColorHint, Phase, PhaseCycle, PhaseKind};
pub use runner::SessionRunner;
pub use scheduler::{Scheduler, SchedulerState, SessionEvent};
pub use snapshot::{format_countdown, SessionSnapshot, SnapshotBus, SnapshotReader};
