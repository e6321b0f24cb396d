//! Drift-safe countdown for the interval of the current item.
//!
//! The clock never counts ticks. Every reading is `now - interval_start`, so a
//! late or skipped tick only delays when expiry is *observed*, never how much
//! time is reported. Pausing freezes `elapsed_ms`; resuming moves the start
//! point forward by the paused span.
//!
//! The clock does no scheduling. The host calls [`SessionClock::tick`] with a
//! timestamp whenever its periodic trigger fires.
//!
//! ## State Transitions
//!
//! ```text
//! Inactive -> Active -> (Paused <-> Active) -> Inactive
//! ```

use serde::{Deserialize, Serialize};

/// Outcome of a single [`SessionClock::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TickResult {
    /// Clock inactive or paused; nothing was measured.
    Unchanged,
    /// Interval still running.
    Continuing { elapsed_ms: u64 },
    /// Interval reached its duration. The caller advances the queue and
    /// starts a new interval.
    Expired { elapsed_ms: u64 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClock {
    is_active: bool,
    is_paused: bool,
    /// Epoch milliseconds at which the current interval (virtually) began.
    interval_start_ms: Option<u64>,
    /// Never above the duration passed to the last `tick`, `pause` or `clamp`.
    elapsed_ms: u64,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn interval_start_ms(&self) -> Option<u64> {
        self.interval_start_ms
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn remaining_ms(&self, duration_ms: u64) -> u64 {
        duration_ms.saturating_sub(self.elapsed_ms)
    }

    /// 0.0 .. 1.0 progress within the current interval.
    pub fn progress_fraction(&self, duration_ms: u64) -> f64 {
        if duration_ms == 0 {
            return 0.0;
        }
        (self.elapsed_ms as f64 / duration_ms as f64).clamp(0.0, 1.0)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start_interval(&mut self, now_ms: u64) {
        self.interval_start_ms = Some(now_ms);
        self.elapsed_ms = 0;
        self.is_active = true;
        self.is_paused = false;
    }

    pub fn tick(&mut self, now_ms: u64, duration_ms: u64) -> TickResult {
        if !self.is_active || self.is_paused {
            return TickResult::Unchanged;
        }
        let Some(elapsed) = self.measure(now_ms, duration_ms) else {
            return TickResult::Unchanged;
        };
        self.elapsed_ms = elapsed;

        if elapsed >= duration_ms {
            TickResult::Expired { elapsed_ms: elapsed }
        } else {
            TickResult::Continuing { elapsed_ms: elapsed }
        }
    }

    /// Freeze elapsed time at `now_ms`, capped at `duration_ms`. Idempotent.
    pub fn pause(&mut self, now_ms: u64, duration_ms: u64) {
        if !self.is_active || self.is_paused {
            return;
        }
        if let Some(elapsed) = self.measure(now_ms, duration_ms) {
            self.elapsed_ms = elapsed;
        }
        self.is_paused = true;
    }

    /// Cap the recorded elapsed time after the interval length shrank.
    pub fn clamp(&mut self, duration_ms: u64) {
        self.elapsed_ms = self.elapsed_ms.min(duration_ms);
    }

    /// Continue from the frozen elapsed value.
    pub fn resume(&mut self, now_ms: u64) {
        if !self.is_active || !self.is_paused {
            return;
        }
        self.interval_start_ms = Some(now_ms.saturating_sub(self.elapsed_ms));
        self.is_paused = false;
    }

    pub fn stop(&mut self) {
        *self = Self::default();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn measure(&self, now_ms: u64, duration_ms: u64) -> Option<u64> {
        let start = self.interval_start_ms?;
        Some(now_ms.saturating_sub(start).min(duration_ms))
    }
}
