//! Where "now" comes from.
//!
//! The session reads time only through [`TimeSource`], so tests drive it with
//! [`ManualTime`] and hosts with [`WallClock`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

pub trait TimeSource {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

/// System wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock;

impl TimeSource for WallClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default()
    }
}

/// Hand-driven time. Clones share the same instant.
#[derive(Debug, Clone, Default)]
pub struct ManualTime {
    now: Arc<AtomicU64>,
}

impl ManualTime {
    pub fn at(now_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(now_ms)),
        }
    }

    pub fn set(&self, now_ms: u64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: u64) {
        self.now.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTime {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
