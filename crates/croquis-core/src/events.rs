use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::queue::ItemId;
use crate::session::SessionSnapshot;

/// Why the queue moved forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvanceReason {
    /// The interval ran out.
    Expired,
    /// The user asked for the next image.
    Manual,
}

/// Every session state change produces an Event.
/// Hosts render from snapshots and log or forward events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        item: ItemId,
        total: usize,
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        item: ItemId,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        item: ItemId,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    ItemAdvanced {
        item: ItemId,
        /// 1-based.
        position: usize,
        total: usize,
        reason: AdvanceReason,
        /// True when this step opened a new cycle over a fresh shuffle.
        reshuffled: bool,
        cycle: u32,
        at: DateTime<Utc>,
    },
    ItemRetreated {
        item: ItemId,
        position: usize,
        total: usize,
        at: DateTime<Utc>,
    },
    SessionStopped {
        items_shown: u64,
        cycles_completed: u32,
        at: DateTime<Utc>,
    },
    DurationChanged {
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot(SessionSnapshot),
}

/// Convert an injected epoch-millisecond reading to an event timestamp.
pub(crate) fn timestamp(now_ms: u64) -> DateTime<Utc> {
    i64::try_from(now_ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_default()
}
