//! Immutable renderer-facing session state and the latest-value channel that carries it.

use std::sync::{Arc, Mutex};

use super::phase::{ColorHint, PhaseKind};
use crate::sync::lock;

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub phase: PhaseKind,
    pub phase_index: usize,
    pub color: ColorHint,

    /// Fraction of the current phase elapsed, in \[0, 1\]
    pub progress: f64,

    pub remaining_in_phase_s: f64,
    pub countdown_remaining_s: f64,
    pub countdown_active: bool,
    pub breaths_per_minute: f64,
    pub is_running: bool,

    /// Set when a timed session completed; cleared by start, reset or a config change
    pub did_finish: bool,
}

impl SessionSnapshot {
    /// One-line text rendering: phase, remaining seconds, ring progress, rate, countdown
    pub fn status_line(&self) -> String {
        const BAR_WIDTH: usize = 20;
        let filled = (self.progress.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
        let bar = format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled));

        let mut line = format!(
            "{:<6} {:>3}s [{}] {:.1} breaths/min",
            self.phase.as_str(),
            self.remaining_in_phase_s.round() as u64,
            bar,
            self.breaths_per_minute,
        );
        if self.countdown_active {
            line.push_str(&format!(
                "  session {}",
                format_countdown(self.countdown_remaining_s)
            ));
        }
        if !self.is_running {
            line.push_str(if self.did_finish {
                "  (complete)"
            } else {
                "  (paused)"
            });
        }
        line
    }
}

/// Format seconds as `MM:SS`, truncating fractional seconds
pub fn format_countdown(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Publishing side of the snapshot channel; only the latest value is kept
#[derive(Debug, Clone)]
pub struct SnapshotBus {
    latest: Arc<Mutex<Published>>,
}

#[derive(Debug)]
struct Published {
    generation: u64,
    snapshot: SessionSnapshot,
}

impl SnapshotBus {
    pub fn new(initial: SessionSnapshot) -> Self {
        Self {
            latest: Arc::new(Mutex::new(Published {
                generation: 0,
                snapshot: initial,
            })),
        }
    }

    /// Replace the latest snapshot
    pub fn publish(&self, snapshot: SessionSnapshot) {
        let mut published = lock(&self.latest);
        published.generation += 1;
        published.snapshot = snapshot;
    }

    /// Create a read-only handle for a renderer
    pub fn subscribe(&self) -> SnapshotReader {
        SnapshotReader {
            latest: Arc::clone(&self.latest),
        }
    }
}

/// Read-only handle to the latest published snapshot
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    latest: Arc<Mutex<Published>>,
}

impl SnapshotReader {
    /// Copy of the latest snapshot
    pub fn latest(&self) -> SessionSnapshot {
        lock(&self.latest).snapshot.clone()
    }

    /// Number of publishes so far; lets a renderer skip unchanged frames
    pub fn generation(&self) -> u64 {
        lock(&self.latest).generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            phase: PhaseKind::Inhale,
            phase_index: 0,
            color: PhaseKind::Inhale.color(),
            progress: 0.5,
            remaining_in_phase_s: 2.0,
            countdown_remaining_s: 299.5,
            countdown_active: true,
            breaths_per_minute: 5.0,
            is_running: true,
            did_finish: false,
        }
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(300.0), "05:00");
        assert_eq!(format_countdown(59.9), "00:59");
        assert_eq!(format_countdown(61.0), "01:01");
        assert_eq!(format_countdown(-3.0), "00:00");
    }

    #[test]
    fn test_status_line_running() {
        let line = snapshot().status_line();
        assert!(line.starts_with("Inhale"));
        assert!(line.contains("2s"));
        assert!(line.contains("[##########----------]"));
        assert!(line.contains("5.0 breaths/min"));
        assert!(line.contains("session 04:59"));
        assert!(!line.contains("paused"));
    }

    #[test]
    fn test_status_line_finished_without_countdown() {
        let mut snap = snapshot();
        snap.is_running = false;
        snap.did_finish = true;
        snap.countdown_active = false;
        let line = snap.status_line();
        assert!(line.ends_with("(complete)"));
        assert!(!line.contains("session"));
    }

    #[test]
    fn test_reader_sees_latest_publish() {
        let bus = SnapshotBus::new(snapshot());
        let reader = bus.subscribe();
        assert_eq!(reader.generation(), 0);

        let mut next = snapshot();
        next.phase = PhaseKind::Hold;
        next.phase_index = 1;
        bus.publish(next.clone());
        bus.publish(next.clone());

        assert_eq!(reader.generation(), 2);
        assert_eq!(reader.latest(), next);
    }
}
