use crate::error::SourceError;

use super::model::Track;

/// A listener's opinion of a track.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Vote {
    Up,
    Down,
}

/// Supplies tracks one at a time.
///
/// The scheduler calls `next_track` once per advance, always from its own
/// thread, so implementations need no internal locking.
pub trait TrackSource: Send {
    fn next_track(&mut self) -> Result<Track, SourceError>;

    /// Human-readable station name for status displays.
    fn name(&self) -> &str;

    /// Record a vote on `track`. Sources without a use for votes ignore them.
    fn vote(&mut self, _track: &Track, _vote: Vote) -> Result<(), SourceError> {
        Ok(())
    }
}
