//! Track sources.
//!
//! The scheduler only sees the `TrackSource` trait. `Station` is the local
//! implementation: a scanned music directory or a TOML station file, played
//! in (optionally shuffled) rotation.

mod directory;
mod model;
mod playlist;
mod rotation;
mod source;

use std::path::Path;

use crate::config::StationSettings;
use crate::error::{SourceError, StationError};

pub use directory::scan;
pub use model::Track;
pub use playlist::{load_station_file, parse_station_file};
pub use source::{TrackSource, Vote};

use rotation::Rotation;

pub struct Station {
    name: String,
    rotation: Rotation,
}

impl Station {
    pub fn new(name: impl Into<String>, tracks: Vec<Track>, settings: &StationSettings) -> Self {
        Self {
            name: name.into(),
            rotation: Rotation::new(tracks, settings.shuffle, settings.repeat),
        }
    }

    /// Open `path` as a station: a directory is scanned, anything else is
    /// read as a station file.
    pub fn open(path: &Path, settings: &StationSettings) -> Result<Self, StationError> {
        let display = path.display().to_string();

        let (name, tracks) = if path.is_dir() {
            let name = path
                .file_name()
                .and_then(|s| s.to_str())
                .map(str::to_string)
                .unwrap_or_else(|| display.clone());
            (name, scan(path, settings))
        } else {
            let file = load_station_file(path)?;
            (file.name.unwrap_or_else(|| display.clone()), file.tracks)
        };

        if tracks.is_empty() {
            return Err(StationError::Empty(display));
        }
        Ok(Self::new(name, tracks, settings))
    }

    pub fn len(&self) -> usize {
        self.rotation.len()
    }
}

/// Remote urls are left to the player; local files can vanish while the
/// station is on air.
fn is_playable(track: &Track) -> bool {
    track.url.contains("://") || Path::new(&track.url).exists()
}

impl TrackSource for Station {
    fn next_track(&mut self) -> Result<Track, SourceError> {
        for _ in 0..self.rotation.len().max(1) {
            let track = self.rotation.next()?;
            if is_playable(&track) {
                log::debug!("new track for station {}: {}", self.name, track.title);
                return Ok(track);
            }
            log::warn!("skipping {}: file is gone", track.url);
        }
        Err(SourceError::Unavailable(format!(
            "none of the {} tracks of {} can be found",
            self.rotation.len(),
            self.name
        )))
    }

    fn name(&self) -> &str {
        &self.name
    }

    /// A down-vote drops the track from the station; an up-vote keeps it.
    fn vote(&mut self, track: &Track, vote: Vote) -> Result<(), SourceError> {
        match vote {
            Vote::Up => log::info!("{} up-voted on {}", track.title, self.name),
            Vote::Down => match self.rotation.remove(&track.id) {
                Some(_) => log::info!(
                    "{} down-voted and dropped from {} ({} tracks left)",
                    track.title,
                    self.name,
                    self.rotation.len()
                ),
                None => log::debug!("down-vote on {}, which is not in {}", track.id, self.name),
            },
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
