//! Breathing phases and the four-phase cycle.

use std::fmt;

use crate::params::{SessionConfig, MIN_PHASE_DURATION_S};

/// Semantic role of a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    Inhale,
    Hold,
    Exhale,
    Rest,
}

impl PhaseKind {
    /// Cycle order
    pub const ALL: [PhaseKind; 4] = [
        PhaseKind::Inhale,
        PhaseKind::Hold,
        PhaseKind::Exhale,
        PhaseKind::Rest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseKind::Inhale => "Inhale",
            PhaseKind::Hold => "Hold",
            PhaseKind::Exhale => "Exhale",
            PhaseKind::Rest => "Rest",
        }
    }

    /// Ring colour used while this phase is active
    pub fn color(&self) -> ColorHint {
        match self {
            PhaseKind::Inhale => ColorHint(0xFF59_9EF2),
            PhaseKind::Hold => ColorHint(0xFF73_73E6),
            PhaseKind::Exhale => ColorHint(0xFF33_8C73),
            PhaseKind::Rest => ColorHint(0xFF59_6699),
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Packed ARGB colour hint for renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorHint(pub u32);

impl ColorHint {
    /// Normalized RGB components in \[0, 1\]
    pub fn rgb(&self) -> [f32; 3] {
        let channel = |shift: u32| ((self.0 >> shift) & 0xFF) as f32 / 255.0;
        [channel(16), channel(8), channel(0)]
    }
}

/// One timed segment of the cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phase {
    pub kind: PhaseKind,
    pub duration_s: f64,
    pub color: ColorHint,
}

impl Phase {
    pub fn new(kind: PhaseKind, duration_s: f64) -> Self {
        Self {
            kind,
            duration_s,
            color: kind.color(),
        }
    }

    /// Zero-length phases are never entered
    pub fn is_skipped(&self) -> bool {
        self.duration_s <= MIN_PHASE_DURATION_S
    }
}

/// The ordered, cyclic Inhale → Hold → Exhale → Rest sequence
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseCycle {
    phases: [Phase; 4],
}

impl PhaseCycle {
    pub fn new(inhale_s: f64, hold_s: f64, exhale_s: f64, rest_s: f64) -> Self {
        Self {
            phases: [
                Phase::new(PhaseKind::Inhale, inhale_s),
                Phase::new(PhaseKind::Hold, hold_s),
                Phase::new(PhaseKind::Exhale, exhale_s),
                Phase::new(PhaseKind::Rest, rest_s),
            ],
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.inhale_s, config.hold_s, config.exhale_s, config.rest_s)
    }

    pub fn phases(&self) -> &[Phase; 4] {
        &self.phases
    }

    /// Phase at `index`, wrapping around the cycle
    pub fn get(&self, index: usize) -> &Phase {
        &self.phases[index % self.phases.len()]
    }

    /// Sum of positive phase durations (seconds)
    pub fn cycle_duration_s(&self) -> f64 {
        self.phases
            .iter()
            .map(|p| if p.duration_s > 0.0 { p.duration_s } else { 0.0 })
            .sum()
    }

    /// Breathing rate; 0 when every phase is empty
    pub fn breaths_per_minute(&self) -> f64 {
        let duration = self.cycle_duration_s();
        if duration > 0.0 {
            60.0 / duration
        } else {
            0.0
        }
    }

    /// True when every phase would be skipped
    pub fn is_degenerate(&self) -> bool {
        self.phases.iter().all(Phase::is_skipped)
    }

    /// Index of the next non-skipped phase after `current`
    ///
    /// At most one skip attempt per phase is made; for a degenerate cycle the
    /// result is still a valid index but names a skipped phase.
    pub fn next_index(&self, current: usize) -> usize {
        let len = self.phases.len();
        let mut next = (current + 1) % len;
        let mut attempts = 0;
        while self.phases[next].is_skipped() && attempts < len {
            next = (next + 1) % len;
            attempts += 1;
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_breaths_per_minute() {
        let cycle = PhaseCycle::new(4.0, 2.0, 6.0, 0.0);
        assert_eq!(cycle.cycle_duration_s(), 12.0);
        assert_eq!(cycle.breaths_per_minute(), 5.0);

        let empty = PhaseCycle::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(empty.breaths_per_minute(), 0.0);
        assert!(empty.is_degenerate());
    }

    #[test]
    fn test_cycle_duration_ignores_negative() {
        let cycle = PhaseCycle::new(4.0, -2.0, 6.0, 0.0);
        assert_eq!(cycle.cycle_duration_s(), 10.0);
    }

    #[test]
    fn test_next_index_skips_empty_phases() {
        let cycle = PhaseCycle::new(4.0, 0.0, 6.0, 0.0);
        assert_eq!(cycle.next_index(0), 2); // Inhale -> Exhale
        assert_eq!(cycle.next_index(2), 0); // Exhale -> Inhale

        let full = PhaseCycle::new(4.0, 2.0, 6.0, 1.0);
        assert_eq!(full.next_index(0), 1);
        assert_eq!(full.next_index(3), 0);
    }

    #[test]
    fn test_next_index_single_phase_returns_itself() {
        let cycle = PhaseCycle::new(0.0, 0.0, 5.0, 0.0);
        assert_eq!(cycle.next_index(2), 2);
        assert_eq!(cycle.next_index(0), 2);
    }

    #[test]
    fn test_tiny_phase_counts_as_skipped() {
        let cycle = PhaseCycle::new(4.0, 0.01, 6.0, 0.005);
        assert!(cycle.get(1).is_skipped());
        assert!(cycle.get(3).is_skipped());
        assert_eq!(cycle.next_index(0), 2);
    }

    #[test]
    fn test_color_hint_rgb() {
        let [r, g, b] = PhaseKind::Inhale.color().rgb();
        assert!((r - 0x59 as f32 / 255.0).abs() < 1e-6);
        assert!((g - 0x9E as f32 / 255.0).abs() < 1e-6);
        assert!((b - 0xF2 as f32 / 255.0).abs() < 1e-6);
        assert_eq!(PhaseCycle::new(1.0, 1.0, 1.0, 1.0).get(2).color, PhaseKind::Exhale.color());
    }

    fn duration() -> impl Strategy<Value = f64> {
        prop_oneof![Just(0.0), Just(0.01), 0.0f64..20.0]
    }

    proptest! {
        #[test]
        fn test_next_index_never_lands_on_skipped_phase(
            d in prop::array::uniform4(duration()),
            current in 0usize..4,
        ) {
            let cycle = PhaseCycle::new(d[0], d[1], d[2], d[3]);
            let next = cycle.next_index(current);
            prop_assert!(next < 4);
            if !cycle.is_degenerate() {
                prop_assert!(!cycle.get(next).is_skipped());
            }
        }

        #[test]
        fn test_next_index_is_cyclic(
            d in prop::array::uniform4(0.02f64..20.0),
            current in 0usize..4,
        ) {
            // With no skipped phases the walk is exactly +1 mod 4
            let cycle = PhaseCycle::new(d[0], d[1], d[2], d[3]);
            prop_assert_eq!(cycle.next_index(current), (current + 1) % 4);
        }

        #[test]
        fn test_breaths_per_minute_is_finite(d in prop::array::uniform4(duration())) {
            let cycle = PhaseCycle::new(d[0], d[1], d[2], d[3]);
            let bpm = cycle.breaths_per_minute();
            prop_assert!(bpm.is_finite());
            prop_assert!(bpm >= 0.0);
        }
    }
}
