//! The albums tab.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

use crate::client::state::{ClientApp, Screen};

use super::render::{render_controls, render_header};
use super::words::render_name_modal;

/// Render the albums tab.
pub fn render(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let Screen::Albums(view) = &app.screen else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Min(5),    // List
        Constraint::Length(2), // Controls
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0], app, "Albums");

    let lines: Vec<Line> = if app.store.albums.is_empty() {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "No albums yet. Press [a] to create one.",
                Style::default().fg(Color::DarkGray),
            )),
        ]
    } else {
        app.store
            .albums
            .iter()
            .enumerate()
            .map(|(i, album)| {
                let is_cursor = i == view.cursor;
                let prefix = if is_cursor { "> " } else { "  " };

                let style = if is_cursor {
                    Style::default().fg(Color::Yellow).bold()
                } else {
                    Style::default().fg(Color::White)
                };

                let count = app.store.album_words(album.id).len();
                Line::from(vec![
                    Span::styled(prefix, style),
                    Span::styled(album.name.clone(), style),
                    Span::styled(
                        format!("  ({} words)", count),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])
            })
            .collect()
    };

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" My Albums ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, chunks[1]);

    render_controls(
        frame,
        chunks[2],
        "Enter open  ·  a add  ·  Tab quiz  ·  s sign out  ·  q quit",
    );

    if let Some(modal) = &view.add_modal {
        render_name_modal(frame, area, modal, " New Album ");
    }
}
