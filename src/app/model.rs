//! Application model: what the terminal UI knows about the station.
//!
//! The scheduler thread owns playback. `App` only holds the latest snapshot
//! of its published `PlaybackInfo` and turns it into display text.

use std::time::{Duration, Instant};

use crate::config::{TrackField, UiSettings};
use crate::mpris::ControlCmd;
use crate::scheduler::{PlaybackHandle, PlaybackInfo, PlaybackState, SchedulerCmd};
use crate::station::Track;

/// The main application model.
pub struct App {
    /// Station name shown until the scheduler publishes its own.
    pub station: String,
    pub playback_handle: Option<PlaybackHandle>,
    snapshot: PlaybackInfo,
}

impl App {
    pub fn new(station: impl Into<String>) -> Self {
        Self {
            station: station.into(),
            playback_handle: None,
            snapshot: PlaybackInfo::default(),
        }
    }

    /// Attach the handle the scheduler thread publishes into.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    /// Copy the scheduler's latest playback info.
    ///
    /// Returns `true` when the state or the track changed, which is when
    /// MPRIS needs refreshing.
    pub fn sync(&mut self) -> bool {
        let Some(info) = self
            .playback_handle
            .as_ref()
            .and_then(|h| h.lock().ok().map(|i| i.clone()))
        else {
            return false;
        };

        let changed = info.state != self.snapshot.state
            || info.track.as_ref().map(|t| &t.id) != self.snapshot.track.as_ref().map(|t| &t.id);
        if !info.station.is_empty() {
            self.station = info.station.clone();
        }
        self.snapshot = info;
        changed
    }

    pub fn playback(&self) -> PlaybackState {
        self.snapshot.state
    }

    pub fn track(&self) -> Option<&Track> {
        self.snapshot.track.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.snapshot.error.as_deref()
    }

    /// Time left in the current track as of `now`, once the player reported it.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        if self.snapshot.state != PlaybackState::Playing {
            return None;
        }
        self.snapshot
            .ends_at
            .map(|end| end.saturating_duration_since(now))
    }

    /// Build the "now playing" text according to `ui` settings.
    pub fn now_playing_text(&self, ui: &UiSettings) -> Option<String> {
        let track = self.track()?;
        let parts: Vec<&str> = ui
            .now_playing_fields
            .iter()
            .filter_map(|f| track_field(track, *f))
            .collect();

        if parts.is_empty() {
            Some(track.title.clone())
        } else {
            Some(parts.join(ui.now_playing_separator.as_str()))
        }
    }

    /// One-line status: state, station, track and countdown.
    pub fn status_text(&self, ui: &UiSettings, now: Instant) -> String {
        let mut parts: Vec<String> = Vec::new();

        let state = match self.playback() {
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        };
        parts.push(state.to_string());
        parts.push(format!("Station: {}", self.station));

        if let Some(song) = self.now_playing_text(ui) {
            match self.remaining(now) {
                Some(left) => parts.push(format!("Song: {song} [-{}]", format_mmss(left))),
                None => parts.push(format!("Song: {song}")),
            }
        }

        parts.join(" • ")
    }
}

fn track_field(track: &Track, field: TrackField) -> Option<&str> {
    let value = match field {
        TrackField::Title => Some(track.title.as_str()),
        TrackField::Artist => track.artist.as_deref(),
        TrackField::Album => track.album.as_deref(),
        TrackField::Genre => track.genre.as_deref(),
        TrackField::Url => Some(track.url.as_str()),
    };
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Format a `Duration` as `MM:SS`.
pub fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Map an MPRIS or keyboard control to a scheduler command.
///
/// `Quit` has no scheduler counterpart; the runtime handles it.
pub fn command_for(cmd: ControlCmd) -> Option<SchedulerCmd> {
    match cmd {
        ControlCmd::Quit => None,
        ControlCmd::Play => Some(SchedulerCmd::Play),
        ControlCmd::Pause => Some(SchedulerCmd::Pause),
        ControlCmd::PlayPause => Some(SchedulerCmd::TogglePause),
        ControlCmd::Stop => Some(SchedulerCmd::Stop),
        ControlCmd::Next => Some(SchedulerCmd::Skip),
    }
}
