//! Phase scheduler: the Idle/Running state machine that paces the breathing cycle.
//!
//! The scheduler is driven by wall-clock ticks. Each tick accumulates the real
//! elapsed time into the current phase, counts down the session budget, skips
//! zero-length phases and asks the cue player for the tone of every phase it
//! enters. When the budget runs out the scheduler arms itself and finishes at
//! the next return to the inhale phase, never mid-cycle.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};

use super::phase::{Phase, PhaseCycle, PhaseKind};
use super::snapshot::SessionSnapshot;
use crate::audio::{Cue, CuePlayer};
use crate::params::{SessionConfig, MIN_PHASE_DURATION_S};

/// Mutable timing state, owned by the scheduler
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerState {
    pub phase_index: usize,
    pub phase_elapsed_s: f64,
    pub countdown_remaining_s: f64,
    pub is_running: bool,

    /// Countdown expired; finish at the next return to phase 0
    pub armed_to_finish: bool,

    pub did_finish: bool,
}

impl SchedulerState {
    fn fresh(config: &SessionConfig) -> Self {
        Self {
            phase_index: 0,
            phase_elapsed_s: 0.0,
            countdown_remaining_s: config.countdown_s,
            is_running: false,
            armed_to_finish: false,
            did_finish: false,
        }
    }
}

/// State change caused by a tick or control call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    Started,
    Paused,
    Reset,
    PhaseChanged { index: usize, phase: PhaseKind },
    CountdownExpired,
    Finished,
}

/// Cyclic four-phase timer with session countdown
pub struct Scheduler {
    config: SessionConfig,
    cycle: PhaseCycle,
    state: SchedulerState,
    last_tick: Option<Instant>,
    player: Arc<dyn CuePlayer>,
}

impl Scheduler {
    pub fn new(config: SessionConfig, player: Arc<dyn CuePlayer>) -> Self {
        let cycle = PhaseCycle::from_config(&config);
        let state = SchedulerState::fresh(&config);
        Self {
            config,
            cycle,
            state,
            last_tick: None,
            player,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    pub fn cycle(&self) -> &PhaseCycle {
        &self.cycle
    }

    pub fn current_phase(&self) -> &Phase {
        self.cycle.get(self.state.phase_index)
    }

    /// Fraction of the current phase elapsed, in \[0, 1\]
    pub fn progress(&self) -> f64 {
        let duration = self.current_phase().duration_s.max(MIN_PHASE_DURATION_S);
        (self.state.phase_elapsed_s / duration).min(1.0)
    }

    pub fn remaining_in_phase_s(&self) -> f64 {
        (self.current_phase().duration_s - self.state.phase_elapsed_s).max(0.0)
    }

    pub fn breaths_per_minute(&self) -> f64 {
        self.cycle.breaths_per_minute()
    }

    /// Immutable view for renderers
    pub fn snapshot(&self) -> SessionSnapshot {
        let phase = self.current_phase();
        SessionSnapshot {
            phase: phase.kind,
            phase_index: self.state.phase_index,
            color: phase.color,
            progress: self.progress(),
            remaining_in_phase_s: self.remaining_in_phase_s(),
            countdown_remaining_s: self.state.countdown_remaining_s,
            countdown_active: self.config.countdown_active(),
            breaths_per_minute: self.breaths_per_minute(),
            is_running: self.state.is_running,
            did_finish: self.state.did_finish,
        }
    }

    /// Idle → Running; resumes from the frozen position
    pub fn start(&mut self) -> Vec<SessionEvent> {
        if self.state.is_running {
            return Vec::new();
        }
        if self.state.countdown_remaining_s <= 0.0 {
            self.state.countdown_remaining_s = self.config.countdown_s;
        }
        self.state.did_finish = false;
        self.state.armed_to_finish = false;
        self.state.is_running = true;
        self.last_tick = None;

        info!(
            "Session started at {} ({:.1}s left in phase)",
            self.current_phase().kind,
            self.remaining_in_phase_s()
        );
        let phase = *self.current_phase();
        self.cue_phase(&phase);
        vec![SessionEvent::Started]
    }

    /// Running → Idle; position and countdown freeze, audio is silenced
    pub fn pause_or_stop(&mut self) -> Vec<SessionEvent> {
        if !self.state.is_running {
            return Vec::new();
        }
        self.state.is_running = false;
        self.last_tick = None;
        self.player.stop();
        info!("Session paused");
        vec![SessionEvent::Paused]
    }

    /// Any → Idle at phase 0 with a full countdown
    pub fn reset(&mut self) -> Vec<SessionEvent> {
        self.state = SchedulerState::fresh(&self.config);
        self.last_tick = None;
        self.player.stop();
        info!("Session reset");
        vec![SessionEvent::Reset]
    }

    /// Install a new configuration snapshot
    ///
    /// A change to any duration or the countdown resets the session. Turning
    /// sound off only silences the current cue.
    pub fn apply_config(&mut self, config: SessionConfig) -> Vec<SessionEvent> {
        let timing_changed = !self.config.same_timing(&config);
        let sound_switched_off = self.config.sound_enabled && !config.sound_enabled;

        self.cycle = PhaseCycle::from_config(&config);
        self.config = config;

        if timing_changed {
            return self.reset();
        }
        if sound_switched_off {
            self.player.stop();
        }
        Vec::new()
    }

    /// Advance by the wall-clock time elapsed since the previous tick
    pub fn tick(&mut self, now: Instant) -> Vec<SessionEvent> {
        if !self.state.is_running {
            self.last_tick = None;
            return Vec::new();
        }
        let delta_s = match self.last_tick {
            Some(previous) => now.saturating_duration_since(previous).as_secs_f64(),
            None => 0.0,
        };
        self.last_tick = Some(now);
        self.advance(delta_s)
    }

    /// Advance by an explicit elapsed time (seconds)
    pub fn advance(&mut self, delta_s: f64) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if !self.state.is_running {
            return events;
        }
        let delta_s = if delta_s.is_finite() {
            delta_s.max(0.0)
        } else {
            0.0
        };

        if self.config.countdown_active() && !self.state.armed_to_finish {
            self.state.countdown_remaining_s -= delta_s;
            if self.state.countdown_remaining_s <= 0.0 {
                self.state.countdown_remaining_s = 0.0;
                self.state.armed_to_finish = true;
                info!("Countdown expired, finishing after this cycle");
                events.push(SessionEvent::CountdownExpired);
            }
        }

        let phase = *self.current_phase();
        if phase.is_skipped() {
            self.advance_phase(&mut events);
            return events;
        }

        self.state.phase_elapsed_s += delta_s;
        if self.state.phase_elapsed_s >= phase.duration_s {
            self.advance_phase(&mut events);
        }
        events
    }

    fn advance_phase(&mut self, events: &mut Vec<SessionEvent>) {
        if self.cycle.is_degenerate() {
            // Nothing to time; finish instead of spinning
            self.finish(events);
            return;
        }

        let next = self.cycle.next_index(self.state.phase_index);
        if self.state.armed_to_finish && next == 0 {
            self.finish(events);
            return;
        }

        self.state.phase_index = next;
        self.state.phase_elapsed_s = 0.0;
        let phase = *self.cycle.get(next);
        debug!("Phase -> {} ({:.1}s)", phase.kind, phase.duration_s);
        events.push(SessionEvent::PhaseChanged {
            index: next,
            phase: phase.kind,
        });
        self.cue_phase(&phase);
    }

    fn finish(&mut self, events: &mut Vec<SessionEvent>) {
        self.state.is_running = false;
        self.state.armed_to_finish = false;
        self.state.did_finish = true;
        self.state.phase_index = 0;
        self.state.phase_elapsed_s = 0.0;
        self.last_tick = None;

        self.player.stop();
        if self.config.sound_enabled {
            self.player.play(Cue::Success);
        }
        info!("Session complete");
        events.push(SessionEvent::Finished);
    }

    fn cue_phase(&self, phase: &Phase) {
        if !self.config.sound_enabled {
            return;
        }
        if let Some(cue) = Cue::for_phase(phase) {
            self.player.play(cue);
        }
    }
}
