//! In-memory `LineChannel` that answers commands from a script.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::PlayerError;

use super::transport::{LineChannel, LineRead};

#[derive(Debug, Default)]
pub(crate) struct Script {
    /// Lines the player prints right after launch.
    pub banner: Vec<String>,
    /// Queued answers per command word, consumed in order.
    pub responses: HashMap<String, VecDeque<LineRead>>,
    /// Answers used once a command's queue is empty.
    pub fallback: HashMap<String, LineRead>,
    pub fail_spawn: bool,
    /// The player exits after the first banner line.
    pub exit_on_launch: bool,
    /// The player prints its whole banner, then exits.
    pub exit_after_banner: bool,
    pub open: bool,
    pub opened_with: Vec<Vec<String>>,
    pub sent: Vec<String>,
    pub closes: usize,
    pending: VecDeque<LineRead>,
}

impl Script {
    pub fn respond(&mut self, command: &str, line: &str) {
        self.respond_with(command, LineRead::Line(line.to_string()));
    }

    pub fn respond_with(&mut self, command: &str, read: LineRead) {
        self.responses
            .entry(command.to_string())
            .or_default()
            .push_back(read);
    }

    pub fn respond_always(&mut self, command: &str, line: &str) {
        self.fallback
            .insert(command.to_string(), LineRead::Line(line.to_string()));
    }

    /// Commands sent since the last launch, in order.
    pub fn sent_since_open(&self) -> &[String] {
        &self.sent
    }
}

pub(crate) struct ScriptedChannel {
    script: Arc<Mutex<Script>>,
}

impl ScriptedChannel {
    pub fn new() -> (Self, Arc<Mutex<Script>>) {
        let script = Arc::new(Mutex::new(Script {
            banner: vec![
                "VLC media player 3.0.20 Vetinari\n".to_string(),
                "Command Line Interface initialized. Type `help' for help.\n".to_string(),
            ],
            ..Script::default()
        }));
        (
            Self {
                script: script.clone(),
            },
            script,
        )
    }
}

impl LineChannel for ScriptedChannel {
    fn open(&mut self, args: &[String]) -> Result<(), PlayerError> {
        let mut s = self.script.lock().unwrap();
        if s.fail_spawn {
            return Err(PlayerError::Spawn {
                program: "vlc".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            });
        }
        s.open = true;
        s.opened_with.push(args.to_vec());
        s.sent.clear();
        let shown = if s.exit_on_launch { 1 } else { s.banner.len() };
        let mut pending: VecDeque<LineRead> = s
            .banner
            .iter()
            .take(shown)
            .cloned()
            .map(LineRead::Line)
            .collect();
        if s.exit_on_launch || s.exit_after_banner {
            pending.push_back(LineRead::Eof);
        }
        s.pending = pending;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.script.lock().unwrap().open
    }

    fn write_line(&mut self, text: &str) -> Result<(), PlayerError> {
        let mut s = self.script.lock().unwrap();
        if !s.open {
            return Err(PlayerError::NotOpen);
        }
        s.sent.push(text.to_string());

        let word = text.split_whitespace().next().unwrap_or_default().to_string();
        let answer = match s.responses.get_mut(&word).and_then(|q| q.pop_front()) {
            Some(a) => Some(a),
            None => s.fallback.get(&word).cloned(),
        };
        if let Some(a) = answer {
            s.pending.push_back(a);
        }
        Ok(())
    }

    fn read_line(&mut self, _timeout: Duration) -> Result<LineRead, PlayerError> {
        let mut s = self.script.lock().unwrap();
        if !s.open {
            return Err(PlayerError::NotOpen);
        }
        // End of output stays put until the channel is closed, like a
        // disconnected pipe.
        match s.pending.pop_front() {
            Some(LineRead::Eof) => {
                s.pending.push_front(LineRead::Eof);
                Ok(LineRead::Eof)
            }
            Some(read) => Ok(read),
            None => Ok(LineRead::Timeout),
        }
    }

    fn discard_pending(&mut self) -> usize {
        let mut s = self.script.lock().unwrap();
        let before = s.pending.len();
        s.pending.retain(|r| *r == LineRead::Eof);
        before - s.pending.len()
    }

    fn close(&mut self) {
        let mut s = self.script.lock().unwrap();
        if s.open {
            s.open = false;
            s.closes += 1;
        }
        s.pending.clear();
    }
}
