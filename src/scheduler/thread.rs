use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::Instant;

use crate::error::PlayerError;
use crate::player::LineChannel;
use crate::station::TrackSource;

use super::machine::Scheduler;
use super::types::{PlaybackHandle, SchedulerCmd};

/// Run `scheduler` on its own thread, fed by `rx`.
///
/// The wait between polls is a `recv_timeout` on the command channel, so a
/// `Stop` or `Quit` takes effect immediately instead of after the sleep.
pub(super) fn spawn_scheduler_thread<S, C>(
    mut scheduler: Scheduler<S, C>,
    rx: Receiver<SchedulerCmd>,
    playback_info: PlaybackHandle,
) -> JoinHandle<()>
where
    S: TrackSource + 'static,
    C: LineChannel + 'static,
{
    thread::spawn(move || {
        publish(&scheduler, &playback_info, None);

        loop {
            let received = match scheduler.next_tick() {
                Some(at) => rx.recv_timeout(at.saturating_duration_since(Instant::now())),
                None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };

            let result = match received {
                Ok(SchedulerCmd::Quit) | Err(RecvTimeoutError::Disconnected) => break,
                Ok(cmd) => apply(&mut scheduler, cmd),
                Err(RecvTimeoutError::Timeout) => scheduler.tick(),
            };

            if let Err(ref e) = result {
                log::error!("playback halted: {e}");
            }
            publish(&scheduler, &playback_info, result.err());
        }

        scheduler.stop();
        publish(&scheduler, &playback_info, None);
        log::debug!("scheduler thread finished");
    })
}

fn apply<S: TrackSource, C: LineChannel>(
    scheduler: &mut Scheduler<S, C>,
    cmd: SchedulerCmd,
) -> Result<(), PlayerError> {
    log::debug!("command {cmd:?} in {:?}", scheduler.state());
    match cmd {
        SchedulerCmd::Play => scheduler.play(),
        SchedulerCmd::Pause => scheduler.pause(),
        SchedulerCmd::TogglePause => scheduler.toggle_pause(),
        SchedulerCmd::Stop => {
            scheduler.stop();
            Ok(())
        }
        SchedulerCmd::Skip => scheduler.skip(),
        SchedulerCmd::SeekBy(secs) => scheduler.seek_by(secs),
        SchedulerCmd::VolumeUp => scheduler.volume_up(),
        SchedulerCmd::VolumeDown => scheduler.volume_down(),
        SchedulerCmd::Vote(vote) => scheduler.vote(vote),
        SchedulerCmd::Quit => Ok(()),
    }
}

fn publish<S: TrackSource, C: LineChannel>(
    scheduler: &Scheduler<S, C>,
    playback_info: &PlaybackHandle,
    error: Option<PlayerError>,
) {
    if let Ok(mut info) = playback_info.lock() {
        info.state = scheduler.state();
        info.station = scheduler.source().name().to_string();
        info.track = scheduler.track().cloned();
        info.ends_at = scheduler.track_ends_at();
        if let Some(e) = error {
            info.error = Some(e.to_string());
        } else if info.track.is_some() {
            info.error = None;
        }
    }
}
