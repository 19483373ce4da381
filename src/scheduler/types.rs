//! Scheduler commands, playback state and the info snapshot shared with
//! front ends.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::station::{Track, Vote};

/// The playback state owned by the scheduler.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerCmd {
    /// Start the station, or resume when paused.
    Play,
    /// Pause when playing.
    Pause,
    /// Pause when playing, play otherwise.
    TogglePause,
    /// Shut the player down.
    Stop,
    /// Fetch the next track and play it now.
    Skip,
    /// Seek by the specified number of seconds (positive or negative).
    SeekBy(i64),
    VolumeUp,
    VolumeDown,
    /// Vote on the current track; a down-vote also skips it.
    Vote(Vote),
    /// Stop the player and end the scheduler thread.
    Quit,
}

/// Runtime playback information published by the scheduler thread.
#[derive(Debug, Clone, Default)]
pub struct PlaybackInfo {
    pub state: PlaybackState,
    /// Name of the station being played.
    pub station: String,
    /// The track the player was last told to play.
    pub track: Option<Track>,
    /// When the current track is expected to end, once the player has said so.
    pub ends_at: Option<Instant>,
    /// Last error that halted playback; cleared when a track starts.
    pub error: Option<String>,
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
