use std::fmt;

use serde::Deserialize;

/// A single playable item handed out by a station.
///
/// Never mutated once built; advancing replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    /// Length in seconds, when the station knows it.
    #[serde(default)]
    pub duration: Option<u64>,
    /// Anything the player can open: a stream url or a local path.
    pub url: String,
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}, {} ({}): {}",
            self.artist.as_deref().unwrap_or("?"),
            self.album.as_deref().unwrap_or("?"),
            self.title,
            self.genre.as_deref().unwrap_or("?"),
            self.id
        )
    }
}
