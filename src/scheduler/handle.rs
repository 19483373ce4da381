use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::config::Settings;
use crate::player::{LineChannel, PlayerClient};
use crate::station::TrackSource;

use super::machine::Scheduler;
use super::thread::spawn_scheduler_thread;
use super::types::{PlaybackHandle, PlaybackInfo, SchedulerCmd};

/// Front-end side of the scheduler thread.
pub struct SchedulerHandle {
    tx: Sender<SchedulerCmd>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl SchedulerHandle {
    /// Start the scheduler thread. It owns `source` and the player behind
    /// `channel` until it ends.
    pub fn spawn<S, C>(source: S, channel: C, settings: &Settings) -> Self
    where
        S: TrackSource + 'static,
        C: LineChannel + 'static,
    {
        let (tx, rx) = mpsc::channel::<SchedulerCmd>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let client = PlayerClient::new(channel, &settings.player);
        let scheduler = Scheduler::new(source, client, &settings.scheduler);
        let join = spawn_scheduler_thread(scheduler, rx, playback_info.clone());

        Self {
            tx,
            playback: playback_info,
            join: Mutex::new(Some(join)),
        }
    }

    pub fn playback_handle(&self) -> PlaybackHandle {
        self.playback.clone()
    }

    pub fn send(&self, cmd: SchedulerCmd) -> Result<(), mpsc::SendError<SchedulerCmd>> {
        self.tx.send(cmd)
    }

    /// Stop the player and wait for the scheduler thread to finish.
    pub fn shutdown(&self) {
        let _ = self.send(SchedulerCmd::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
