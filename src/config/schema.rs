use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/tapehead/config.toml` or `~/.config/tapehead/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `TAPEHEAD__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub player: PlayerSettings,
    pub scheduler: SchedulerSettings,
    pub station: StationSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Player executable, looked up on `PATH`.
    pub executable: String,
    /// Arguments placed before the track url when launching the player.
    pub args: Vec<String>,
    /// Startup lines printed by the player before it accepts commands.
    pub banner_lines: usize,
    /// How long to wait for a single response line (milliseconds).
    pub response_timeout_ms: u64,
    /// How long the player gets to exit on shutdown before it is killed (milliseconds).
    pub shutdown_grace_ms: u64,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            executable: "vlc".to_string(),
            args: vec!["-Irc".to_string(), "--quiet".to_string()],
            banner_lines: 2,
            response_timeout_ms: 1000,
            shutdown_grace_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    /// How many times an unanswered time-remaining query is retried before
    /// giving up on the track.
    pub retry_count: u32,
    /// Delay between two time-remaining queries (milliseconds).
    pub retry_delay_ms: u64,
    /// Advance this much before the reported end of a track (milliseconds).
    pub advance_margin_ms: u64,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            retry_count: 10,
            retry_delay_ms: 200,
            advance_margin_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StationSettings {
    /// Play station tracks in random order.
    pub shuffle: bool,
    /// Start over (reshuffled) once every track was played.
    pub repeat: bool,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for StationSettings {
    fn default() -> Self {
        Self {
            shuffle: true,
            repeat: true,
            extensions: vec![
                "mp3".into(),
                "flac".into(),
                "wav".into(),
                "ogg".into(),
                "m4a".into(),
                "aac".into(),
            ],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to seek when pressing `H` / `L`.
    pub seek_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { seek_seconds: 10 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,

    /// Which track fields to show in the "now playing" line, and in what order.
    ///
    /// Example: ["artist", "title", "album"]
    pub now_playing_fields: Vec<TrackField>,

    /// Separator used to join `now_playing_fields`.
    pub now_playing_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ tapehead: one track after another ~ ".to_string(),
            now_playing_fields: vec![TrackField::Artist, TrackField::Title],
            now_playing_separator: " - ".to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackField {
    Title,
    Artist,
    Album,
    Genre,
    Url,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Default filter when `RUST_LOG` is unset, e.g. `info` or `tapehead=debug`.
    pub level: String,
    /// Log file, truncated on startup. Defaults to the XDG state directory.
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
