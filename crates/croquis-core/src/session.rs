//! Session orchestrator.
//!
//! Owns the queue engine and the session clock together so that expiry
//! (advance the queue, restart the interval) is always applied as one step.
//! The session is not reentrant: a host that drives it from several threads
//! wraps the single instance in one mutex, see [`SharedSession`].
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused -> Finished -> Running ...
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = Session::seeded(WallClock, None, config.timer.clone());
//! session.start(library.ids())?;
//! // Every ~100ms, from the host's scheduler:
//! if let Some(event) = session.tick() { /* image changed */ }
//! ```

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::clock::{SessionClock, TickResult, TimeSource, WallClock};
use crate::duration::TimerConfig;
use crate::error::SessionError;
use crate::events::{timestamp, AdvanceReason, Event};
use crate::queue::{Advance, ItemId, QueueEngine};

/// A session shared between a ticker and an input thread.
pub type SharedSession<T = WallClock, R = Mcg128Xsl64> = Arc<Mutex<Session<T, R>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Running,
    Paused,
    Finished,
}

impl SessionStatus {
    pub fn is_active(self) -> bool {
        matches!(self, SessionStatus::Running | SessionStatus::Paused)
    }
}

/// Read-only view for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub item: Option<ItemId>,
    /// 1-based position within the current cycle.
    pub position: Option<usize>,
    pub total: usize,
    pub elapsed_ms: u64,
    pub remaining_ms: u64,
    pub duration_ms: u64,
    /// 0.0 .. 1.0 progress within the current interval.
    pub progress: f64,
    pub cycle_count: u32,
    pub is_active: bool,
    pub is_paused: bool,
    pub at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct Session<T = WallClock, R = Mcg128Xsl64> {
    time: T,
    queue: QueueEngine<R>,
    clock: SessionClock,
    timer: TimerConfig,
    status: SessionStatus,
    items_shown: u64,
    intervals_completed: u64,
}

impl<T: TimeSource> Session<T, Mcg128Xsl64> {
    /// Session with a PCG shuffle source; `None` seeds from entropy.
    pub fn seeded(time: T, seed: Option<u64>, timer: TimerConfig) -> Self {
        let rng = match seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Self::new(time, rng, timer)
    }
}

impl<T: TimeSource, R: Rng> Session<T, R> {
    pub fn new(time: T, rng: R, timer: TimerConfig) -> Self {
        Self {
            time,
            queue: QueueEngine::new(rng),
            clock: SessionClock::new(),
            timer,
            status: SessionStatus::Idle,
            items_shown: 0,
            intervals_completed: 0,
        }
    }

    /// Wrap in the single mutex that guards queue and clock together.
    pub fn into_shared(self) -> SharedSession<T, R> {
        Arc::new(Mutex::new(self))
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn timer(&self) -> &TimerConfig {
        &self.timer
    }

    pub fn duration_ms(&self) -> u64 {
        self.timer.duration_ms()
    }

    pub fn queue(&self) -> &QueueEngine<R> {
        &self.queue
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    /// Images shown so far, counting the first one and manual navigation.
    pub fn items_shown(&self) -> u64 {
        self.items_shown
    }

    /// Intervals that ran to expiry. Manual navigation does not count.
    pub fn intervals_completed(&self) -> u64 {
        self.intervals_completed
    }

    pub fn current_item(&self) -> Option<&ItemId> {
        self.queue.current_item()
    }

    /// Items queued after the current one, for prefetching.
    pub fn upcoming(&self, limit: usize) -> &[ItemId] {
        self.queue.upcoming(limit)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let duration_ms = self.duration_ms();
        SessionSnapshot {
            status: self.status,
            item: self.queue.current_item().cloned(),
            position: self.queue.position().map(|p| p + 1),
            total: self.queue.len(),
            elapsed_ms: self.clock.elapsed_ms(),
            remaining_ms: self.clock.remaining_ms(duration_ms),
            duration_ms,
            progress: self.clock.progress_fraction(duration_ms),
            cycle_count: self.queue.cycle_count(),
            is_active: self.clock.is_active(),
            is_paused: self.clock.is_paused(),
            at: timestamp(self.time.now_ms()),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Shuffle `items` and show the first one. Restarts an active session.
    ///
    /// With no items the session is left exactly as it was.
    pub fn start<I>(&mut self, items: I) -> Result<Event, SessionError>
    where
        I: IntoIterator,
        I::Item: Into<ItemId>,
    {
        self.queue.start(items)?;
        let now = self.time.now_ms();
        self.clock.start_interval(now);
        self.status = SessionStatus::Running;
        self.items_shown = 1;
        self.intervals_completed = 0;
        debug!(total = self.queue.len(), duration_ms = self.duration_ms(), "session started");

        Ok(Event::SessionStarted {
            item: self.current_item_owned(),
            total: self.queue.len(),
            duration_ms: self.duration_ms(),
            at: timestamp(now),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.status != SessionStatus::Running {
            return None;
        }
        let now = self.time.now_ms();
        let duration_ms = self.duration_ms();
        self.clock.pause(now, duration_ms);
        self.status = SessionStatus::Paused;
        debug!(elapsed_ms = self.clock.elapsed_ms(), "session paused");
        Some(Event::SessionPaused {
            item: self.current_item_owned(),
            remaining_ms: self.clock.remaining_ms(self.duration_ms()),
            at: timestamp(now),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        if self.status != SessionStatus::Paused {
            return None;
        }
        let now = self.time.now_ms();
        self.clock.resume(now);
        self.status = SessionStatus::Running;
        debug!(elapsed_ms = self.clock.elapsed_ms(), "session resumed");
        Some(Event::SessionResumed {
            item: self.current_item_owned(),
            remaining_ms: self.clock.remaining_ms(self.duration_ms()),
            at: timestamp(now),
        })
    }

    /// Skip to the next image. A paused session stays paused on the new image.
    pub fn next(&mut self) -> Option<Event> {
        if !self.status.is_active() {
            return None;
        }
        let now = self.time.now_ms();
        Some(self.advance(AdvanceReason::Manual, now))
    }

    /// Go back one image, wrapping to the end of the current order.
    pub fn previous(&mut self) -> Option<Event> {
        if !self.status.is_active() {
            return None;
        }
        let now = self.time.now_ms();
        self.queue.retreat();
        self.restart_interval(now);
        Some(Event::ItemRetreated {
            item: self.current_item_owned(),
            position: self.queue.position().map_or(0, |p| p + 1),
            total: self.queue.len(),
            at: timestamp(now),
        })
    }

    /// Advance the clock to the injected "now".
    pub fn tick(&mut self) -> Option<Event> {
        let now = self.time.now_ms();
        self.tick_at(now)
    }

    /// Advance the clock to `now_ms`. Returns an event only when the interval
    /// expired and the next image is shown.
    pub fn tick_at(&mut self, now_ms: u64) -> Option<Event> {
        if self.status != SessionStatus::Running {
            trace!(status = ?self.status, "stale tick ignored");
            return None;
        }
        match self.clock.tick(now_ms, self.duration_ms()) {
            TickResult::Expired { .. } => {
                self.intervals_completed += 1;
                Some(self.advance(AdvanceReason::Expired, now_ms))
            }
            TickResult::Continuing { .. } | TickResult::Unchanged => None,
        }
    }

    pub fn stop(&mut self) -> Option<Event> {
        if !self.status.is_active() {
            return None;
        }
        let now = self.time.now_ms();
        let cycles_completed = self.queue.cycle_count();
        self.queue.stop();
        self.clock.stop();
        self.status = SessionStatus::Finished;
        debug!(items_shown = self.items_shown, cycles_completed, "session stopped");
        Some(Event::SessionStopped {
            items_shown: self.items_shown,
            cycles_completed,
            at: timestamp(now),
        })
    }

    /// Replace the timer configuration. The next tick measures against the
    /// new duration, so a shortened interval may expire immediately.
    pub fn set_timer_config(&mut self, timer: TimerConfig) -> Option<Event> {
        let before = self.duration_ms();
        self.timer = timer;
        let duration_ms = self.duration_ms();
        if duration_ms == before {
            return None;
        }
        self.clock.clamp(duration_ms);
        debug!(before, duration_ms, "interval length changed");
        Some(Event::DurationChanged {
            duration_ms,
            at: timestamp(self.time.now_ms()),
        })
    }

    pub fn set_avoid_repeat(&mut self, avoid_repeat: bool) {
        self.queue.set_avoid_repeat(avoid_repeat);
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance(&mut self, reason: AdvanceReason, now_ms: u64) -> Event {
        let step = self.queue.advance();
        let reshuffled = matches!(step, Advance::NewCycle { reshuffled: true });
        self.restart_interval(now_ms);
        debug!(?reason, reshuffled, position = ?self.queue.position(), "advanced");
        Event::ItemAdvanced {
            item: self.current_item_owned(),
            position: self.queue.position().map_or(0, |p| p + 1),
            total: self.queue.len(),
            reason,
            reshuffled,
            cycle: self.queue.cycle_count(),
            at: timestamp(now_ms),
        }
    }

    fn restart_interval(&mut self, now_ms: u64) {
        self.clock.start_interval(now_ms);
        if self.status == SessionStatus::Paused {
            let duration_ms = self.duration_ms();
            self.clock.pause(now_ms, duration_ms);
        }
        self.items_shown += 1;
    }

    fn current_item_owned(&self) -> ItemId {
        self.queue.current_item().cloned().unwrap_or_default()
    }
}
