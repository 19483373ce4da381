//! Player control client: the rc command vocabulary on top of a `LineChannel`.
//!
//! Every command that produces a response has that response read before the
//! next command goes out, so reads never drift out of step with requests.

use std::time::Duration;

use crate::config::PlayerSettings;
use crate::error::PlayerError;

use super::parse::parse_leading_number;
use super::transport::{LineChannel, LineRead};
use super::types::TimeRemaining;

pub struct PlayerClient<C: LineChannel> {
    channel: C,
    program: String,
    args: Vec<String>,
    banner_lines: usize,
    response_timeout: Duration,
    // Last successfully parsed `get_time`, returned when a read is garbage.
    elapsed: u64,
    // Length of the current track, once the player has reported one.
    length: Option<u64>,
    paused: bool,
}

impl<C: LineChannel> PlayerClient<C> {
    pub fn new(channel: C, settings: &PlayerSettings) -> Self {
        Self {
            channel,
            program: settings.executable.clone(),
            args: settings.args.clone(),
            banner_lines: settings.banner_lines,
            response_timeout: Duration::from_millis(settings.response_timeout_ms),
            elapsed: 0,
            length: None,
            paused: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.channel.is_open()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn cached_elapsed(&self) -> u64 {
        self.elapsed
    }

    /// Last non-zero length reported for the current track.
    pub fn known_length(&self) -> Option<u64> {
        self.length
    }

    /// Play `url`, launching the player on first use.
    ///
    /// With a player already running, the url is enqueued and the playlist
    /// advanced to it.
    pub fn play(&mut self, url: &str) -> Result<(), PlayerError> {
        if self.channel.is_open() {
            self.enqueue(url)?;
            return self.skip();
        }

        let mut args = self.args.clone();
        args.push(url.to_string());
        self.channel.open(&args)?;
        self.elapsed = 0;
        self.length = None;
        self.paused = false;

        for _ in 0..self.banner_lines {
            match self.channel.read_line(self.response_timeout)? {
                LineRead::Line(line) => log::debug!("player banner: {}", line.trim_end()),
                LineRead::Timeout => {
                    log::debug!("player banner shorter than expected");
                    break;
                }
                LineRead::Eof => {
                    self.channel.close();
                    return Err(PlayerError::Spawn {
                        program: self.program.clone(),
                        source: std::io::Error::new(
                            std::io::ErrorKind::UnexpectedEof,
                            "player exited during startup",
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn enqueue(&mut self, url: &str) -> Result<(), PlayerError> {
        self.channel.write_line(&format!("enqueue {url}"))
    }

    /// Toggle pause. The player's actual state is not queried back.
    pub fn pause(&mut self) -> Result<(), PlayerError> {
        self.channel.write_line("pause")?;
        self.paused = !self.paused;
        Ok(())
    }

    /// Shut the player down. A no-op without a running player.
    pub fn stop(&mut self) {
        if !self.channel.is_open() {
            return;
        }
        if let Err(e) = self.channel.write_line("shutdown") {
            log::debug!("shutdown command not delivered: {e}");
        }
        self.channel.close();
        self.paused = false;
        self.elapsed = 0;
        self.length = None;
    }

    pub fn volume_up(&mut self) -> Result<(), PlayerError> {
        self.command_discard_response("volup")
    }

    pub fn volume_down(&mut self) -> Result<(), PlayerError> {
        self.command_discard_response("voldown")
    }

    /// Advance the player's playlist.
    pub fn skip(&mut self) -> Result<(), PlayerError> {
        self.channel.write_line("next")?;
        self.elapsed = 0;
        self.length = None;
        Ok(())
    }

    /// Seek to an absolute position in seconds.
    pub fn seek(&mut self, seconds: u64) -> Result<(), PlayerError> {
        self.channel.write_line(&format!("seek {seconds}"))
    }

    /// Seconds played in the current track.
    ///
    /// The player is slow to answer right after a seek and its output can go
    /// out of sync; any unparseable answer returns the last known value.
    pub fn elapsed_seconds(&mut self) -> Result<u64, PlayerError> {
        match self.query_number("get_time")? {
            Some(n) => self.elapsed = n,
            None => log::debug!("get_time unreadable, using cached {}s", self.elapsed),
        }
        Ok(self.elapsed)
    }

    /// Seconds left in the current track, from `get_length` and `get_time`.
    pub fn time_remaining(&mut self) -> Result<TimeRemaining, PlayerError> {
        let duration = self.query_number("get_length")?;
        if !self.channel.is_open() {
            return Ok(TimeRemaining::Unknown);
        }
        let elapsed = self.query_number("get_time")?;

        let (Some(duration), Some(elapsed)) = (duration, elapsed) else {
            log::debug!(
                "unable to parse time remaining (length {duration:?}, time {elapsed:?})"
            );
            return Ok(TimeRemaining::Unknown);
        };

        self.elapsed = elapsed;
        if duration > 0 {
            self.length = Some(duration);
        }
        if elapsed > duration {
            log::debug!("elapsed {elapsed}s exceeds length {duration}s; reads disagree");
            return Ok(TimeRemaining::Unknown);
        }
        Ok(TimeRemaining::Known(duration - elapsed))
    }

    fn command_discard_response(&mut self, command: &str) -> Result<(), PlayerError> {
        self.send_request(command)?;
        match self.channel.read_line(self.response_timeout)? {
            LineRead::Line(_) | LineRead::Timeout => Ok(()),
            LineRead::Eof => {
                self.handle_eof(command);
                Ok(())
            }
        }
    }

    /// Send `command` and parse its single response line as a number.
    ///
    /// `Ok(None)` covers garbage, timeouts and a player that just exited.
    fn query_number(&mut self, command: &str) -> Result<Option<u64>, PlayerError> {
        self.send_request(command)?;
        match self.channel.read_line(self.response_timeout)? {
            LineRead::Line(line) => {
                let n = parse_leading_number(&line);
                if n.is_none() {
                    log::debug!("unparseable {command} response: {:?}", line);
                }
                Ok(n)
            }
            LineRead::Timeout => {
                log::debug!("{command}: no response within {:?}", self.response_timeout);
                Ok(None)
            }
            LineRead::Eof => {
                self.handle_eof(command);
                Ok(None)
            }
        }
    }

    /// Write a command whose response will be read next.
    ///
    /// Late answers to earlier timed-out requests are flushed first so they
    /// cannot be mistaken for this command's response.
    fn send_request(&mut self, command: &str) -> Result<(), PlayerError> {
        let stale = self.channel.discard_pending();
        if stale > 0 {
            log::debug!("discarded {stale} stale line(s) before {command}");
        }
        self.channel.write_line(command)
    }

    fn handle_eof(&mut self, command: &str) {
        log::warn!("player closed its output while answering {command}");
        self.channel.close();
        self.paused = false;
    }
}

impl<C: LineChannel> Drop for PlayerClient<C> {
    fn drop(&mut self) {
        self.stop();
    }
}
