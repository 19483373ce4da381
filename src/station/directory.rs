use std::path::Path;

use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use walkdir::WalkDir;

use crate::config::StationSettings;

use super::model::Track;

fn is_audio_file(path: &Path, settings: &StationSettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn non_empty(v: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn read_track(root: &Path, path: &Path) -> Track {
    let title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();

    let id = path
        .strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned();

    let mut track = Track {
        id,
        title,
        artist: None,
        album: None,
        genre: None,
        duration: None,
        url: path.to_string_lossy().into_owned(),
    };

    // Unreadable tags are fine; the player decides whether the file plays.
    let Ok(tagged) = lofty::read_from_path(path) else {
        return track;
    };

    let secs = tagged.properties().duration().as_secs();
    if secs > 0 {
        track.duration = Some(secs);
    }

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        if let Some(title) = non_empty(tag.title()) {
            track.title = title;
        }
        track.artist = non_empty(tag.artist());
        track.album = non_empty(tag.album());
        track.genre = non_empty(tag.genre());
    }
    track
}

/// Collect the playable files under `dir`, sorted by path.
pub fn scan(dir: &Path, settings: &StationSettings) -> Vec<Track> {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut tracks: Vec<Track> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file() && is_audio_file(e.path(), settings))
        .map(|e| read_track(dir, e.path()))
        .collect();

    tracks.sort_by(|a, b| a.url.cmp(&b.url));
    log::info!("scanned {} tracks under {}", tracks.len(), dir.display());
    tracks
}
