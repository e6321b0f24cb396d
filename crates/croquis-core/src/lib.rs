//! # Croquis Core Library
//!
//! The timing and sequencing engine behind Croquis, a gesture-drawing practice
//! tool. Reference images are shown one at a time in shuffled order and each
//! stays up for a configured interval before the session moves on.
//!
//! ## Architecture
//!
//! - **Queue Engine**: a non-repeating shuffled traversal of the image set that
//!   reshuffles at each cycle boundary
//! - **Session Clock**: a wall-clock based countdown that measures absolute
//!   timestamps, never accumulated tick deltas; the caller drives it by
//!   invoking `tick()` periodically
//! - **Session**: owns both and applies every transition atomically
//! - **Storage**: TOML-based preferences (interval, repeat avoidance)
//!
//! ## Key Components
//!
//! - [`Session`]: session state machine for hosts to drive
//! - [`QueueEngine`]: shuffled queue with injected randomness
//! - [`SessionClock`]: drift-safe interval clock
//! - [`TimerConfig`]: preset or custom interval selection
//! - [`Config`]: persisted preferences

pub mod clock;
pub mod duration;
pub mod error;
pub mod events;
pub mod library;
pub mod queue;
pub mod session;
pub mod storage;

pub use clock::{ManualTime, SessionClock, TickResult, TimeSource, WallClock};
pub use duration::{
    format_seconds, parse_custom_duration, resolve_duration_ms, TimerConfig, TimerPreset,
};
pub use error::{ConfigError, CoreError, DurationError, Result, SessionError};
pub use events::{AdvanceReason, Event};
pub use library::{ImageEntry, ImageLibrary};
pub use queue::{ItemId, QueueEngine};
pub use session::{Session, SessionSnapshot, SessionStatus, SharedSession};
pub use storage::{Config, SessionConfig};
