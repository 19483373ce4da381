//! The play-poll-advance state machine.
//!
//! `Scheduler` never sleeps. It records when it next wants to run
//! (`next_tick`) and the driver thread calls `tick` once that instant has
//! passed, so every wait stays interruptible by incoming commands.

use std::time::{Duration, Instant};

use crate::config::SchedulerSettings;
use crate::error::PlayerError;
use crate::player::{LineChannel, PlayerClient, TimeRemaining};
use crate::station::{Track, TrackSource, Vote};

use super::types::PlaybackState;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Phase {
    Idle,
    /// Asking the player how long the current track has left.
    Probing { attempts: u32 },
    /// Waiting for the current track to finish.
    Waiting,
}

pub struct Scheduler<S: TrackSource, C: LineChannel> {
    source: S,
    client: PlayerClient<C>,
    state: PlaybackState,
    track: Option<Track>,
    phase: Phase,
    next_tick: Option<Instant>,
    retry_count: u32,
    retry_delay: Duration,
    advance_margin: Duration,
}

impl<S: TrackSource, C: LineChannel> Scheduler<S, C> {
    pub fn new(source: S, client: PlayerClient<C>, settings: &SchedulerSettings) -> Self {
        Self {
            source,
            client,
            state: PlaybackState::Stopped,
            track: None,
            phase: Phase::Idle,
            next_tick: None,
            retry_count: settings.retry_count.max(1),
            retry_delay: Duration::from_millis(settings.retry_delay_ms),
            advance_margin: Duration::from_millis(settings.advance_margin_ms),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn track(&self) -> Option<&Track> {
        self.track.as_ref()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn client(&self) -> &PlayerClient<C> {
        &self.client
    }

    /// When `tick` should run next; `None` while there is nothing to wait for.
    pub fn next_tick(&self) -> Option<Instant> {
        self.next_tick
    }

    /// Expected end of the current track, known once the player has reported it.
    pub fn track_ends_at(&self) -> Option<Instant> {
        match self.phase {
            Phase::Waiting => self.next_tick.map(|t| t + self.advance_margin),
            _ => None,
        }
    }

    /// Start the station, or resume a paused track. A no-op while playing.
    pub fn play(&mut self) -> Result<(), PlayerError> {
        match self.state {
            PlaybackState::Playing => Ok(()),
            PlaybackState::Paused => {
                let r = self.client.pause();
                self.guard(r)?;
                self.state = PlaybackState::Playing;
                self.probe_soon();
                Ok(())
            }
            PlaybackState::Stopped => self.advance(),
        }
    }

    /// Pause a playing track. Advancing is suspended until `play`.
    pub fn pause(&mut self) -> Result<(), PlayerError> {
        if self.state != PlaybackState::Playing {
            return Ok(());
        }
        let r = self.client.pause();
        self.guard(r)?;
        self.state = PlaybackState::Paused;
        self.phase = Phase::Idle;
        self.next_tick = None;
        Ok(())
    }

    pub fn toggle_pause(&mut self) -> Result<(), PlayerError> {
        match self.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused | PlaybackState::Stopped => self.play(),
        }
    }

    /// Shut the player down from any state.
    pub fn stop(&mut self) {
        self.halt();
    }

    /// Replace the current track with the next one from the station.
    pub fn skip(&mut self) -> Result<(), PlayerError> {
        match self.state {
            PlaybackState::Stopped => self.play(),
            PlaybackState::Paused => {
                let r = self.client.pause();
                self.guard(r)?;
                self.advance()
            }
            PlaybackState::Playing => self.advance(),
        }
    }

    /// Seek relative to the player's idea of elapsed time.
    ///
    /// Once the track length is known the target stays inside the track;
    /// the player goes idle when asked to seek past the end.
    pub fn seek_by(&mut self, delta: i64) -> Result<(), PlayerError> {
        if self.state == PlaybackState::Stopped {
            return Ok(());
        }
        let r = self.client.elapsed_seconds();
        let elapsed = self.guard(r)?;
        let mut target = elapsed.saturating_add_signed(delta);
        if let Some(length) = self.client.known_length() {
            target = target.min(length.saturating_sub(1));
        }
        let r = self.client.seek(target);
        self.guard(r)?;
        log::debug!("seek from {elapsed}s to {target}s");
        if self.state == PlaybackState::Playing {
            self.probe_soon();
        }
        Ok(())
    }

    pub fn volume_up(&mut self) -> Result<(), PlayerError> {
        if self.state == PlaybackState::Stopped {
            return Ok(());
        }
        let r = self.client.volume_up();
        self.guard(r)
    }

    pub fn volume_down(&mut self) -> Result<(), PlayerError> {
        if self.state == PlaybackState::Stopped {
            return Ok(());
        }
        let r = self.client.volume_down();
        self.guard(r)
    }

    /// Pass a vote on the current track to the source. A down-vote also
    /// moves on to the next track. Without a track the vote is dropped.
    pub fn vote(&mut self, vote: Vote) -> Result<(), PlayerError> {
        let Some(track) = self.track.as_ref() else {
            log::debug!("{vote:?} vote with nothing on air ignored");
            return Ok(());
        };
        // Votes never halt playback.
        if let Err(e) = self.source.vote(track, vote) {
            log::warn!("{vote:?} vote on {track} not recorded: {e}");
        }
        match vote {
            Vote::Up => Ok(()),
            Vote::Down => self.skip(),
        }
    }

    /// Run the pending step of the poll loop.
    ///
    /// Errors leave the scheduler stopped with the player shut down.
    pub fn tick(&mut self) -> Result<(), PlayerError> {
        match self.phase {
            Phase::Idle => {
                self.next_tick = None;
                Ok(())
            }
            Phase::Probing { attempts } => self.probe(attempts),
            Phase::Waiting => self.advance(),
        }
    }

    fn probe(&mut self, attempts: u32) -> Result<(), PlayerError> {
        let r = self.client.time_remaining();
        let remaining = self.guard(r)?;

        match remaining {
            TimeRemaining::Known(secs) if secs > 0 => {
                let wait = Duration::from_secs(secs).saturating_sub(self.advance_margin);
                log::debug!("track has {secs}s left; advancing in {wait:?}");
                self.phase = Phase::Waiting;
                self.next_tick = Some(Instant::now() + wait);
                Ok(())
            }
            // Zero after a real length means the player ran out of track
            // early, e.g. after a seek to the end.
            TimeRemaining::Known(_) if self.client.known_length().is_some() => {
                log::debug!("track ended before it was due");
                self.advance()
            }
            // Before that, zero is what the player reports until it has
            // buffered some of the track.
            _ => {
                let attempts = attempts + 1;
                if attempts > self.retry_count {
                    log::error!(
                        "no time remaining reported after {attempts} attempts; maybe the track failed to download"
                    );
                    self.halt();
                    return Err(PlayerError::Stall { attempts });
                }
                self.phase = Phase::Probing { attempts };
                self.next_tick = Some(Instant::now() + self.retry_delay);
                Ok(())
            }
        }
    }

    /// Fetch the next track and hand it to the player.
    fn advance(&mut self) -> Result<(), PlayerError> {
        let track = match self.source.next_track() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("station {} stopped: {e}", self.source.name());
                self.halt();
                return Err(e.into());
            }
        };

        let r = self.client.play(&track.url);
        self.guard(r)?;

        log::info!("now playing {track}");
        self.track = Some(track);
        self.state = PlaybackState::Playing;
        self.probe_soon();
        Ok(())
    }

    fn probe_soon(&mut self) {
        self.phase = Phase::Probing { attempts: 0 };
        self.next_tick = Some(Instant::now() + self.retry_delay);
    }

    /// Any player failure leaves nothing to schedule; shut down and report it.
    fn guard<T>(&mut self, result: Result<T, PlayerError>) -> Result<T, PlayerError> {
        if result.is_err() {
            self.halt();
        }
        result
    }

    fn halt(&mut self) {
        self.client.stop();
        self.state = PlaybackState::Stopped;
        self.track = None;
        self.phase = Phase::Idle;
        self.next_tick = None;
    }
}
