mod engine;
mod shuffle;

pub use engine::{Advance, QueueEngine, MAX_RESHUFFLE_ATTEMPTS};
pub use shuffle::fisher_yates;

/// Opaque reference to a user-supplied image.
pub type ItemId = String;
