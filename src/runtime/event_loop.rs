use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{self, App};
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::update_mpris;
use crate::scheduler::{SchedulerCmd, SchedulerHandle};
use crate::station::Vote;
use crate::ui;

/// Main terminal event loop: draws the UI, forwards keys and MPRIS calls to
/// the scheduler thread, and mirrors its state to MPRIS. Returns `Ok(())`
/// when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    scheduler: &SchedulerHandle,
    mpris: &MprisHandle,
    control_tx: &mpsc::Sender<ControlCmd>,
    control_rx: &mpsc::Receiver<ControlCmd>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Auto-advance and errors happen on the scheduler thread; pick them up here.
        if app.sync() {
            update_mpris(mpris, app);
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, scheduler) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, scheduler, control_tx) {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn handle_control_cmd(cmd: ControlCmd, scheduler: &SchedulerHandle) -> bool {
    log::debug!("control {cmd:?}");
    match app::command_for(cmd) {
        Some(c) => {
            if scheduler.send(c).is_err() {
                log::error!("scheduler thread is gone");
                return true;
            }
            false
        }
        None => true,
    }
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    scheduler: &SchedulerHandle,
    control_tx: &mpsc::Sender<ControlCmd>,
) -> bool {
    let seek = i64::try_from(settings.controls.seek_seconds).unwrap_or(i64::MAX);

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            // Behave like MPRIS PlayPause.
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('n') | KeyCode::Char('l') => {
            let _ = control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('s') => {
            let _ = control_tx.send(ControlCmd::Stop);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let _ = scheduler.send(SchedulerCmd::VolumeUp);
        }
        KeyCode::Char('-') => {
            let _ = scheduler.send(SchedulerCmd::VolumeDown);
        }
        KeyCode::Char('L') => {
            let _ = scheduler.send(SchedulerCmd::SeekBy(seek));
        }
        KeyCode::Char('H') => {
            let _ = scheduler.send(SchedulerCmd::SeekBy(-seek));
        }
        KeyCode::Char('u') => {
            let _ = scheduler.send(SchedulerCmd::Vote(Vote::Up));
        }
        KeyCode::Char('d') => {
            let _ = scheduler.send(SchedulerCmd::Vote(Vote::Down));
        }
        _ => {}
    }

    false
}
