//! The add-word form.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};

use crate::client::state::{AddWordField, AddWordForm, ClientApp, Screen};

use super::render::{render_controls, render_header};

/// Render the add-word form.
pub fn render(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let Screen::AddWord(form) = &app.screen else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Length(3), // Word input
        Constraint::Min(8),    // Definition candidates
        Constraint::Length(3), // Notes input
        Constraint::Length(1), // Error line
        Constraint::Length(2), // Controls
    ])
    .margin(1)
    .split(area);

    let title = match form.album_id.and_then(|id| app.store.album(id)) {
        Some(album) => format!("Add Word to {}", album.name),
        None => "Add Word".to_string(),
    };
    render_header(frame, chunks[0], app, &title);

    render_input(
        frame,
        chunks[1],
        " Word ",
        &form.word,
        form.focus == AddWordField::Word,
    );
    render_candidates(frame, chunks[2], form);
    render_input(
        frame,
        chunks[3],
        " Notes ",
        &form.notes,
        form.focus == AddWordField::Notes,
    );

    if let Some(err) = &form.error {
        let widget = Paragraph::new(err.clone())
            .alignment(Alignment::Center)
            .fg(Color::Red);
        frame.render_widget(widget, chunks[4]);
    }

    let hints = match form.focus {
        AddWordField::Word => "[Enter] look up  ·  [Tab] next field  ·  [Esc] back",
        AddWordField::Definition => "j/k choose definition  ·  [Enter] save  ·  [Esc] back",
        AddWordField::Notes => "[Enter] save  ·  [Tab] next field  ·  [Esc] back",
    };
    render_controls(frame, chunks[5], hints);
}

fn render_input(frame: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
    let border = if focused { Color::Yellow } else { Color::DarkGray };
    let cursor = if focused { "_" } else { "" };

    let widget = Paragraph::new(Line::from(vec![
        Span::styled(value.to_string(), Style::default().fg(Color::White)),
        Span::styled(cursor, Style::default().fg(Color::Yellow)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(title.to_string())
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_candidates(frame: &mut Frame, area: Rect, form: &AddWordForm) {
    let focused = form.focus == AddWordField::Definition;
    let border = if focused { Color::Yellow } else { Color::DarkGray };

    let lines: Vec<Line> = if form.looking_up {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "Looking up definitions...",
                Style::default().fg(Color::Yellow),
            )),
        ]
    } else if form.candidates.is_empty() {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "Type a word and press [Enter] to fetch definitions.",
                Style::default().fg(Color::DarkGray),
            )),
        ]
    } else {
        form.candidates
            .iter()
            .enumerate()
            .map(|(i, candidate)| {
                let is_selected = i == form.selected;
                let prefix = if is_selected { "> " } else { "  " };

                let style = if is_selected {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::White)
                };

                Line::from(vec![
                    Span::styled(prefix, style),
                    Span::styled(
                        format!("({}) ", candidate.part_of_speech),
                        Style::default().fg(Color::Green),
                    ),
                    Span::styled(candidate.definition.clone(), style),
                ])
            })
            .collect()
    };

    let widget = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Definition ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}
