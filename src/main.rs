//! pacedbreath - Paced breathing timer for the terminal
//!
//! Inhale and exhale are accompanied by gliding tones; a short chime marks
//! the end of a timed session.

use std::io::{BufRead, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use log::{info, warn};

use pacedbreath::audio::{export_cues, AudioSystem, CuePlayer, SilentPlayer, ToneBank};
use pacedbreath::cli::Args;
use pacedbreath::params::ToneConfig;
use pacedbreath::session::{Scheduler, SessionRunner};

/// Longest wait for the success chime before exiting
const CHIME_DRAIN: Duration = Duration::from_secs(1);

/// Keyboard command read from stdin
#[derive(Debug, Clone, Copy)]
enum Command {
    Toggle,
    Reset,
    Quit,
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let config = args.session_config().context("invalid session settings")?;
    let tone_config = ToneConfig::default();

    if let Some(dir) = &args.export {
        let mut tones = ToneBank::new(tone_config)?;
        let written = export_cues(dir, &config, &mut tones)
            .with_context(|| format!("failed to export cues to {}", dir.display()))?;
        info!("Exported {} cue file(s) to {}", written.len(), dir.display());
        return Ok(());
    }

    // Audio failures only cost the cues, never the timer
    let audio = if config.sound_enabled {
        match AudioSystem::new(tone_config) {
            Ok(audio) => Some(audio),
            Err(e) => {
                warn!("Audio unavailable, running silently: {}", e);
                None
            }
        }
    } else {
        None
    };
    let player: Arc<dyn CuePlayer> = match &audio {
        Some(audio) => audio.player(),
        None => Arc::new(SilentPlayer),
    };

    let tick = args.tick_config();
    let poll = Duration::from_millis(tick.interval_ms);
    let runner = SessionRunner::spawn(Scheduler::new(config, player), tick)?;
    let reader = runner.subscribe();
    let commands = spawn_command_reader()?;

    println!("pacedbreath: Enter = pause/resume, r = reset, q = quit");
    runner.start();

    let mut drawn = None;
    loop {
        match commands.try_recv() {
            Ok(Command::Toggle) => {
                if runner.snapshot().is_running {
                    runner.pause_or_stop();
                } else {
                    runner.start();
                }
            }
            Ok(Command::Reset) => {
                runner.reset();
            }
            Ok(Command::Quit) => break,
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => {}
        }

        let generation = reader.generation();
        if drawn != Some(generation) {
            drawn = Some(generation);
            let snapshot = reader.latest();
            print!("\r{}\x1b[K", snapshot.status_line());
            std::io::stdout().flush()?;
            if snapshot.did_finish {
                println!();
                break;
            }
        }
        thread::sleep(poll);
    }

    if let Some(audio) = &audio {
        let deadline = Instant::now() + CHIME_DRAIN;
        while audio.player().is_playing() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(20));
        }
    }
    drop(runner);
    Ok(())
}

/// Forward stdin lines as commands until stdin closes
fn spawn_command_reader() -> std::io::Result<Receiver<Command>> {
    let (sender, receiver) = mpsc::channel();
    thread::Builder::new()
        .name("stdin-commands".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                let command = match line.trim() {
                    "q" | "quit" => Command::Quit,
                    "r" | "reset" => Command::Reset,
                    _ => Command::Toggle,
                };
                if sender.send(command).is_err() {
                    break;
                }
            }
        })?;
    Ok(receiver)
}
