use std::env;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::mpris::ControlCmd;
use crate::player::PipeChannel;
use crate::scheduler::{SchedulerCmd, SchedulerHandle};
use crate::station::{Station, TrackSource};

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    let log_file = logging::init_logging(&settings.log);

    let path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let station = Station::open(&path, &settings.station)?;
    log::info!(
        "station {} with {} tracks (log: {:?})",
        station.name(),
        station.len(),
        log_file
    );

    let channel = PipeChannel::new(
        settings.player.executable.clone(),
        Duration::from_millis(settings.player.shutdown_grace_ms),
    );
    let mut app = App::new(station.name());
    let scheduler = SchedulerHandle::spawn(station, channel, &settings);
    app.set_playback_handle(scheduler.playback_handle());

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx.clone());

    mpris_sync::update_mpris(&mpris, &app);

    // The station starts on air.
    let _ = scheduler.send(SchedulerCmd::Play);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &scheduler,
        &mpris,
        &control_tx,
        &control_rx,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    scheduler.shutdown();
    log::info!("bye");

    run_result
}
