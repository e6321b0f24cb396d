use std::io::BufRead;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Subcommand;
use croquis_core::{Config, Event, Session, SessionStatus, SharedSession, WallClock};
use serde::Serialize;
use tracing::{debug, warn};

use crate::scan::load_library;

#[derive(Subcommand)]
pub enum SessionAction {
    /// Print the shuffled order a session would use
    Plan {
        /// Image files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Seed for a reproducible shuffle
        #[arg(long)]
        seed: Option<u64>,
        /// Descend into subdirectories
        #[arg(long, short)]
        recursive: bool,
    },
    /// Run a live session, printing events as JSON lines.
    ///
    /// Commands on stdin: p pause, r resume, n next, b back, s status, q quit.
    Run {
        /// Image files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Seed for a reproducible shuffle
        #[arg(long)]
        seed: Option<u64>,
        /// Descend into subdirectories
        #[arg(long, short)]
        recursive: bool,
        /// Stop once this many images have run their full interval;
        /// skipping with `n` or `b` does not count
        #[arg(long)]
        max_items: Option<u64>,
    },
}

/// One line of stdin input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Pause,
    Resume,
    Next,
    Back,
    Status,
    Quit,
}

impl Input {
    fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "p" | "pause" => Some(Input::Pause),
            "r" | "resume" => Some(Input::Resume),
            "n" | "next" => Some(Input::Next),
            "b" | "back" | "prev" => Some(Input::Back),
            "s" | "status" => Some(Input::Status),
            "q" | "quit" | "stop" => Some(Input::Quit),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct Plan<'a> {
    total: usize,
    order: &'a [String],
}

fn emit(event: &Event) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match action {
        SessionAction::Plan {
            paths,
            seed,
            recursive,
        } => {
            let library = load_library(&paths, recursive);
            let mut session = Session::seeded(WallClock, seed, config.timer.clone());
            session.start(library.ids())?;
            let plan = Plan {
                total: session.queue().len(),
                order: session.queue().order(),
            };
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        SessionAction::Run {
            paths,
            seed,
            recursive,
            max_items,
        } => {
            let library = load_library(&paths, recursive);
            let mut session = Session::seeded(WallClock, seed, config.timer.clone());
            session.set_avoid_repeat(config.session.avoid_repeat);
            emit(&session.start(library.ids())?)?;
            live(session.into_shared(), &config, max_items)?;
        }
    }
    Ok(())
}

/// Drive a started session until it is quit or `max_items` intervals ran out.
///
/// A ticker thread and the input loop share the one session mutex, so an
/// expiry and a user command are never interleaved.
fn live(
    shared: SharedSession,
    config: &Config,
    max_items: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let period = Duration::from_millis(config.session.tick_interval_ms);
    let prefetch_limit = config.session.prefetch_limit;
    let done = Arc::new(AtomicBool::new(false));

    let ticker = {
        let shared = shared.clone();
        let done = done.clone();
        thread::spawn(move || {
            let result = tick_loop(&shared, &done, period, max_items);
            done.store(true, Ordering::SeqCst);
            result
        })
    };

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match Input::parse(&line) {
                Some(input) => {
                    if tx.send(input).is_err() {
                        break;
                    }
                }
                None if line.trim().is_empty() => {}
                None => warn!(input = %line.trim(), "unknown command"),
            }
        }
        debug!("stdin closed");
    });

    while !done.load(Ordering::SeqCst) {
        let input = match rx.recv_timeout(period) {
            Ok(input) => input,
            Err(RecvTimeoutError::Timeout) => continue,
            // No more input; keep running on the ticker alone.
            Err(RecvTimeoutError::Disconnected) => {
                thread::sleep(period);
                continue;
            }
        };

        let mut session = shared.lock().unwrap_or_else(|e| e.into_inner());
        let event = match input {
            Input::Pause => session.pause(),
            Input::Resume => session.resume(),
            Input::Next => session.next(),
            Input::Back => session.previous(),
            Input::Status => {
                emit(&Event::StateSnapshot(session.snapshot()))?;
                let upcoming = serde_json::json!({
                    "type": "Upcoming",
                    "items": session.upcoming(prefetch_limit),
                });
                println!("{upcoming}");
                None
            }
            Input::Quit => session.stop(),
        };
        if let Some(event) = event {
            emit(&event)?;
        }
        if session.status() == SessionStatus::Finished {
            done.store(true, Ordering::SeqCst);
        }
    }

    match ticker.join() {
        Ok(result) => result?,
        Err(_) => return Err("ticker thread panicked".into()),
    }
    Ok(())
}

fn tick_loop(
    shared: &SharedSession,
    done: &AtomicBool,
    period: Duration,
    max_items: Option<u64>,
) -> Result<(), serde_json::Error> {
    while !done.load(Ordering::SeqCst) {
        thread::sleep(period);
        let mut session = shared.lock().unwrap_or_else(|e| e.into_inner());
        if !session.status().is_active() {
            break;
        }
        let Some(event) = session.tick() else {
            continue;
        };
        if max_items.is_some_and(|max| session.intervals_completed() >= max) {
            if let Some(stopped) = session.stop() {
                emit(&stopped)?;
            }
            break;
        }
        emit(&event)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_accepts_short_and_long_forms() {
        assert_eq!(Input::parse("p"), Some(Input::Pause));
        assert_eq!(Input::parse(" Resume "), Some(Input::Resume));
        assert_eq!(Input::parse("prev"), Some(Input::Back));
        assert_eq!(Input::parse("Q"), Some(Input::Quit));
        assert_eq!(Input::parse("jump"), None);
    }
}
