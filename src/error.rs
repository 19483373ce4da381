//! Error types shared by the player client, the scheduler and the stations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the player control channel and the scheduler.
///
/// Response parse noise is never represented here; the client absorbs it
/// and degrades to a cached value or `TimeRemaining::Unknown`.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("failed to launch player `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("no player session is open")]
    NotOpen,
    #[error("player pipe error: {0}")]
    Io(#[from] io::Error),
    #[error("player reported no time remaining after {attempts} attempts; the track may have failed to load")]
    Stall { attempts: u32 },
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Errors reported by a track source when asked for the next track.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("station has no more tracks")]
    EndOfQueue,
    #[error("station unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while loading a station from disk.
#[derive(Debug, Error)]
pub enum StationError {
    #[error("failed to read station file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid station file {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("station {0} contains no playable tracks")]
    Empty(String),
}
