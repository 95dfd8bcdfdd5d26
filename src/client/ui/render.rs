//! Main client UI renderer.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};

use crate::client::state::{ClientApp, Screen};

use super::{add_word, albums, auth, quiz, words};

/// Render the client UI based on the current screen.
pub fn render(frame: &mut Frame, app: &ClientApp) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match &app.screen {
        Screen::Connecting => render_connecting(frame, area, app),
        Screen::SignIn(_) | Screen::SignUp(_) => auth::render(frame, area, app),
        Screen::Words(_) => words::render_all_words(frame, area, app),
        Screen::Albums(_) => albums::render(frame, area, app),
        Screen::AlbumPage(_) => words::render_album_page(frame, area, app),
        Screen::AddWord(_) => add_word::render(frame, area, app),
        Screen::Quiz(_) => quiz::render(frame, area, app),
        Screen::Disconnected(message) => render_disconnected(frame, area, message),
    }
}

fn render_connecting(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let chunks = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(7),
        Constraint::Percentage(40),
    ])
    .split(area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "WORDBOOK",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Connecting to {}...", app.server_addr()),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, chunks[1]);
}

fn render_disconnected(frame: &mut Frame, area: Rect, message: &str) {
    let chunks = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(9),
        Constraint::Percentage(40),
    ])
    .split(area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "WORDBOOK",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            message,
            Style::default().fg(Color::Red).bold(),
        )),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "Press [Q] to exit",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, chunks[1]);
}

/// A centered rectangle for modal dialogs.
pub(super) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .split(area);
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(vertical[1]);
    horizontal[1]
}

/// The header line: title on the left, signed-in email and the transient
/// status on the right.
pub(super) fn render_header(frame: &mut Frame, area: Rect, app: &ClientApp, title: &str) {
    let mut spans = vec![Span::styled(
        format!(" {} ", title),
        Style::default().fg(Color::Cyan).bold(),
    )];
    if let Some(status) = &app.status {
        spans.push(Span::styled(
            format!("  {}", status),
            Style::default().fg(Color::Yellow),
        ));
    }

    let left = Paragraph::new(Line::from(spans));
    frame.render_widget(left, area);

    if let Some(email) = &app.email {
        let right = Paragraph::new(Span::styled(
            format!("{} ", email),
            Style::default().fg(Color::DarkGray),
        ))
        .alignment(Alignment::Right);
        frame.render_widget(right, area);
    }
}

/// The footer line of key hints.
pub(super) fn render_controls(frame: &mut Frame, area: Rect, hints: &str) {
    let widget = Paragraph::new(hints)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
