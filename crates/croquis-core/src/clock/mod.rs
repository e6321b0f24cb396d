mod session_clock;
mod time_source;

pub use session_clock::{SessionClock, TickResult};
pub use time_source::{ManualTime, TimeSource, WallClock};
