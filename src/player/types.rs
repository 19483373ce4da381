//! Small value types shared by the player client and the scheduler.

use std::time::Duration;

/// Seconds left in the current track, as far as the player can tell.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TimeRemaining {
    Known(u64),
    /// Either round-trip failed to parse, or the two reads disagreed.
    Unknown,
}

impl TimeRemaining {
    pub fn as_duration(self) -> Option<Duration> {
        match self {
            TimeRemaining::Known(secs) => Some(Duration::from_secs(secs)),
            TimeRemaining::Unknown => None,
        }
    }
}
