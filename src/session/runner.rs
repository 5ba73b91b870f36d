//! Tick thread that drives a scheduler and publishes snapshots.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use super::scheduler::{Scheduler, SessionEvent};
use super::snapshot::{SessionSnapshot, SnapshotBus, SnapshotReader};
use crate::error::RunnerError;
use crate::params::{SessionConfig, TickConfig};
use crate::sync::lock;

/// Owns the scheduler, its tick thread and the snapshot channel
///
/// Control calls and ticks are serialized through one mutex, so every call
/// returns with the scheduler fully updated and a fresh snapshot published.
pub struct SessionRunner {
    scheduler: Arc<Mutex<Scheduler>>,
    bus: SnapshotBus,
    shutdown: Arc<AtomicBool>,
    tick_thread: Option<thread::JoinHandle<()>>,
}

impl SessionRunner {
    /// Spawn the tick thread for `scheduler`
    pub fn spawn(scheduler: Scheduler, tick_config: TickConfig) -> Result<Self, RunnerError> {
        tick_config.validate()?;

        let bus = SnapshotBus::new(scheduler.snapshot());
        let scheduler = Arc::new(Mutex::new(scheduler));
        let shutdown = Arc::new(AtomicBool::new(false));

        let tick_thread = spawn_tick_thread(
            Duration::from_millis(tick_config.interval_ms),
            Arc::clone(&scheduler),
            bus.clone(),
            Arc::clone(&shutdown),
        )?;

        Ok(Self {
            scheduler,
            bus,
            shutdown,
            tick_thread: Some(tick_thread),
        })
    }

    /// Handle for renderers
    pub fn subscribe(&self) -> SnapshotReader {
        self.bus.subscribe()
    }

    /// Start or resume. A zero-length current phase is skipped before returning.
    pub fn start(&self) -> SessionSnapshot {
        self.control(|s| {
            let mut events = s.start();
            events.extend(s.tick(Instant::now()));
            events
        })
    }

    pub fn pause_or_stop(&self) -> SessionSnapshot {
        self.control(Scheduler::pause_or_stop)
    }

    pub fn reset(&self) -> SessionSnapshot {
        self.control(Scheduler::reset)
    }

    pub fn apply_config(&self, config: SessionConfig) -> SessionSnapshot {
        self.control(move |s| s.apply_config(config))
    }

    /// Current snapshot, computed under the scheduler lock
    pub fn snapshot(&self) -> SessionSnapshot {
        lock(&self.scheduler).snapshot()
    }

    fn control<F>(&self, action: F) -> SessionSnapshot
    where
        F: FnOnce(&mut Scheduler) -> Vec<SessionEvent>,
    {
        let mut scheduler = lock(&self.scheduler);
        log_events(&action(&mut scheduler));
        let snapshot = scheduler.snapshot();
        self.bus.publish(snapshot.clone());
        snapshot
    }
}

impl Drop for SessionRunner {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.tick_thread.take() {
            let _ = handle.join();
        }
        lock(&self.scheduler).pause_or_stop();
    }
}

/// Spawn the fixed-cadence tick loop
fn spawn_tick_thread(
    interval: Duration,
    scheduler: Arc<Mutex<Scheduler>>,
    bus: SnapshotBus,
    shutdown: Arc<AtomicBool>,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("breath-scheduler".into())
        .spawn(move || loop {
            thread::sleep(interval);
            if shutdown.load(Ordering::Acquire) {
                break;
            }

            let mut scheduler = lock(&scheduler);
            if !scheduler.state().is_running {
                continue;
            }
            log_events(&scheduler.tick(Instant::now()));
            bus.publish(scheduler.snapshot());
        })
}

fn log_events(events: &[SessionEvent]) {
    for event in events {
        debug!("Session event: {:?}", event);
    }
}
