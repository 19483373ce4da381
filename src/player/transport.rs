//! Line-oriented pipe to the player subprocess.
//!
//! `PipeChannel` owns exactly one child process. Its stdout and stderr are
//! drained by two reader threads into a single line channel, which is how
//! stderr ends up merged into the response stream.

use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::PlayerError;

/// Outcome of a single `read_line` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRead {
    /// A complete line, terminator included as the player sent it.
    Line(String),
    /// No full line arrived before the timeout.
    Timeout,
    /// The player closed its output streams.
    Eof,
}

/// A bidirectional line channel to a player process.
pub trait LineChannel: Send {
    /// Start the player with `args`.
    fn open(&mut self, args: &[String]) -> Result<(), PlayerError>;
    fn is_open(&self) -> bool;
    /// Send `text` followed by a newline.
    fn write_line(&mut self, text: &str) -> Result<(), PlayerError>;
    /// Block until a line, the timeout, or end of output.
    fn read_line(&mut self, timeout: Duration) -> Result<LineRead, PlayerError>;
    /// Drop lines that arrived without being asked for; returns how many.
    fn discard_pending(&mut self) -> usize;
    /// Best-effort shutdown. Never fails; later calls report `NotOpen`.
    fn close(&mut self);
}

struct Session {
    child: Child,
    stdin: Option<ChildStdin>,
    lines: Receiver<String>,
}

/// Production `LineChannel` backed by `std::process`.
pub struct PipeChannel {
    program: String,
    shutdown_grace: Duration,
    session: Option<Session>,
}

impl PipeChannel {
    pub fn new(program: impl Into<String>, shutdown_grace: Duration) -> Self {
        Self {
            program: program.into(),
            shutdown_grace,
            session: None,
        }
    }

    /// OS process id of the running player, if any.
    pub fn pid(&self) -> Option<u32> {
        self.session.as_ref().map(|s| s.child.id())
    }
}

fn spawn_line_reader<R: Read + Send + 'static>(stream: R, tx: Sender<String>) {
    thread::spawn(move || {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    // The player is not guaranteed to emit valid UTF-8 (track titles).
                    let line = String::from_utf8_lossy(&buf).into_owned();
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            }
        }
    });
}

impl LineChannel for PipeChannel {
    fn open(&mut self, args: &[String]) -> Result<(), PlayerError> {
        if self.session.is_some() {
            self.close();
        }

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| PlayerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let (tx, rx) = mpsc::channel::<String>();
        if let Some(out) = child.stdout.take() {
            spawn_line_reader(out, tx.clone());
        }
        if let Some(err) = child.stderr.take() {
            spawn_line_reader(err, tx);
        }

        log::debug!("spawned `{}` (pid {}) with {:?}", self.program, child.id(), args);

        let stdin = child.stdin.take();
        self.session = Some(Session {
            child,
            stdin,
            lines: rx,
        });
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.session.is_some()
    }

    fn write_line(&mut self, text: &str) -> Result<(), PlayerError> {
        let session = self.session.as_mut().ok_or(PlayerError::NotOpen)?;
        let stdin = session.stdin.as_mut().ok_or(PlayerError::NotOpen)?;
        stdin.write_all(text.as_bytes())?;
        stdin.write_all(b"\n")?;
        stdin.flush()?;
        Ok(())
    }

    fn read_line(&mut self, timeout: Duration) -> Result<LineRead, PlayerError> {
        let session = self.session.as_ref().ok_or(PlayerError::NotOpen)?;
        match session.lines.recv_timeout(timeout) {
            Ok(line) => Ok(LineRead::Line(line)),
            Err(RecvTimeoutError::Timeout) => Ok(LineRead::Timeout),
            Err(RecvTimeoutError::Disconnected) => Ok(LineRead::Eof),
        }
    }

    fn discard_pending(&mut self) -> usize {
        let Some(session) = self.session.as_ref() else {
            return 0;
        };
        let mut n = 0;
        while session.lines.try_recv().is_ok() {
            n += 1;
        }
        n
    }

    fn close(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };

        // Closing stdin ends the rc interface, which makes the player quit.
        drop(session.stdin.take());

        let deadline = Instant::now() + self.shutdown_grace;
        loop {
            match session.child.try_wait() {
                Ok(Some(status)) => {
                    log::debug!("player exited with {status}");
                    return;
                }
                Ok(None) if Instant::now() < deadline => {
                    thread::sleep(Duration::from_millis(20));
                }
                Ok(None) | Err(_) => break,
            }
        }

        log::warn!("player did not exit within {:?}; killing it", self.shutdown_grace);
        let _ = session.child.kill();
        let _ = session.child.wait();
    }
}

impl Drop for PipeChannel {
    fn drop(&mut self) {
        self.close();
    }
}
