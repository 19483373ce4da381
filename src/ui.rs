//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Stylize},
    text::Line,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::{App, format_mmss};
use crate::config::{ControlsSettings, UiSettings};

/// Render the controls help text, incorporating seek seconds.
fn controls_text(seek_seconds: u64) -> String {
    [
        "[space/p] play/pause".to_string(),
        "[n/l] next".to_string(),
        "[s] stop".to_string(),
        format!("[H/L] seek -/+{seek_seconds}s"),
        "[+/-] volume".to_string(),
        "[u/d] vote up/down".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

fn padded() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

/// Detail lines for the track on air.
fn track_lines(app: &App, now: Instant) -> Vec<Line<'static>> {
    let Some(track) = app.track() else {
        return vec![Line::from("Nothing on air")];
    };

    let mut lines = vec![
        Line::from(format!("Title:  {}", track.title)),
        Line::from(format!("Artist: {}", track.artist.as_deref().unwrap_or("-"))),
        Line::from(format!("Album:  {}", track.album.as_deref().unwrap_or("-"))),
        Line::from(format!("Genre:  {}", track.genre.as_deref().unwrap_or("-"))),
        Line::from(format!("Source: {}", track.url)),
    ];
    let left = match app.remaining(now) {
        Some(d) => format!("-{}", format_mmss(d)),
        None => "--:--".to_string(),
    };
    lines.push(Line::from(format!("Left:   {left}")));
    lines
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let now = Instant::now();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" tapehead ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status_par = Paragraph::new(app.status_text(ui_settings, now))
        .block(Block::bordered().padding(padded()).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Now playing, or the error that stopped the station.
    let mut lines = track_lines(app, now);
    if let Some(err) = app.error() {
        lines.push(Line::from(""));
        lines.push(Line::from(format!("Error: {err}")).fg(Color::Red));
        lines.push(Line::from("Press space to start again."));
    }
    let body = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .padding(padded())
                .title(" on air "),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(body, chunks[2]);

    let footer = Paragraph::new(controls_text(controls_settings.seek_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(padded()),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[3]);
}
