//! MPRIS service so desktop media keys and `playerctl` can drive the station.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};

use async_io::{Timer, block_on};
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::scheduler::PlaybackState;
use crate::station::Track;

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.tapehead";
const NO_TRACK: &str = "/org/mpris/MediaPlayer2/TrackList/NoTrack";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackState,
    track_id: Option<OwnedObjectPath>,
    title: Option<String>,
    artist: Vec<String>,
    album: Option<String>,
    genre: Vec<String>,
    url: Option<String>,
    length_micros: Option<i64>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

impl MprisHandle {
    pub fn set_playback(&self, playback: PlaybackState) {
        if let Ok(mut s) = self.state.lock() {
            s.playback = playback;
        }
    }

    pub fn set_track_metadata(&self, track: Option<&Track>) {
        let Ok(mut s) = self.state.lock() else {
            return;
        };
        let Some(track) = track else {
            let playback = s.playback;
            *s = SharedState {
                playback,
                ..SharedState::default()
            };
            return;
        };

        s.track_id = track_object_path(&track.id);
        s.title = Some(track.title.clone());
        s.artist = track.artist.clone().into_iter().collect();
        s.album = track.album.clone();
        s.genre = track.genre.clone().into_iter().collect();
        s.url = Some(track.url.clone());
        s.length_micros = track
            .duration
            .and_then(|secs| i64::try_from(secs.saturating_mul(1_000_000)).ok());
    }
}

/// D-Bus object path for a track id. Ids are free-form, so anything outside
/// `[A-Za-z0-9_]` is replaced.
fn track_object_path(id: &str) -> Option<OwnedObjectPath> {
    let element: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let element = if element.is_empty() { "_".to_string() } else { element };
    ObjectPath::try_from(format!("{OBJECT_PATH}/track/{element}"))
        .ok()
        .map(OwnedObjectPath::from)
}

fn owned<'a>(v: impl Into<Value<'a>>) -> Option<OwnedValue> {
    OwnedValue::try_from(v.into()).ok()
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "tapehead"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string(), "http".to_string(), "https".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    /// Stations only move forward.
    fn previous(&self) {
        log::debug!("MPRIS: Previous ignored");
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.playback {
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let track_id = s
            .track_id
            .clone()
            .or_else(|| ObjectPath::try_from(NO_TRACK).ok().map(OwnedObjectPath::from));
        if let Some(v) = track_id.and_then(owned) {
            map.insert("mpris:trackid".to_string(), v);
        }
        if let Some(v) = s.title.clone().and_then(owned) {
            map.insert("xesam:title".to_string(), v);
        }
        if !s.artist.is_empty() {
            if let Some(v) = owned(s.artist.clone()) {
                map.insert("xesam:artist".to_string(), v);
            }
        }
        if let Some(v) = s.album.clone().and_then(owned) {
            map.insert("xesam:album".to_string(), v);
        }
        if !s.genre.is_empty() {
            if let Some(v) = owned(s.genre.clone()) {
                map.insert("xesam:genre".to_string(), v);
            }
        }
        if let Some(v) = s.url.clone().and_then(owned) {
            map.insert("xesam:url".to_string(), v);
        }
        if let Some(v) = s.length_micros.and_then(owned) {
            map.insert("mpris:length".to_string(), v);
        }
        map
    }
}

pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    log::warn!("MPRIS: failed to connect to session bus: {e}");
                    return;
                }
            };

            if let Err(e) = connection.request_name(BUS_NAME).await {
                log::warn!("MPRIS: failed to acquire name {BUS_NAME}: {e}");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server
                .at(OBJECT_PATH, RootIface { tx: tx.clone() })
                .await
            {
                log::warn!("MPRIS: failed to register root iface: {e}");
                return;
            }

            if let Err(e) = object_server
                .at(
                    OBJECT_PATH,
                    PlayerIface {
                        tx,
                        state: state_for_thread,
                    },
                )
                .await
            {
                log::warn!("MPRIS: failed to register player iface: {e}");
                return;
            }

            log::info!("MPRIS: serving {BUS_NAME}");

            // Keep the service alive.
            loop {
                Timer::after(std::time::Duration::from_secs(3600)).await;
            }
        });
    });

    MprisHandle { state }
}
