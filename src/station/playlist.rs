//! Station files: a TOML list of stream urls with their metadata.
//!
//! ```toml
//! name = "Late night"
//!
//! [[track]]
//! id = "1024"
//! title = "So What"
//! artist = "Miles Davis"
//! album = "Kind of Blue"
//! genre = "Jazz"
//! duration = 562
//! url = "https://example.org/stream/1024.aac"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::StationError;

use super::model::Track;

#[derive(Debug, Deserialize)]
pub struct StationFile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "track")]
    pub tracks: Vec<Track>,
}

pub fn parse_station_file(text: &str, path: &Path) -> Result<StationFile, StationError> {
    toml::from_str(text).map_err(|source| StationError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_station_file(path: &Path) -> Result<StationFile, StationError> {
    let text = std::fs::read_to_string(path).map_err(|source| StationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_station_file(&text, path)
}
