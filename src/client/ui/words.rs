//! The all-words tab and album pages.
//!
//! Both screens are the same word list with different scope and key
//! hints, so they share the list, detail, and confirmation renderers.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use crate::client::state::{ClientApp, Confirm, NameModal, Screen, WordListView};
use crate::models::WordDoc;

use super::render::{centered_rect, render_controls, render_header};

/// Render the all-words tab.
pub fn render_all_words(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let Screen::Words(view) = &app.screen else {
        return;
    };

    let chunks = layout(area);
    render_header(frame, chunks[0], app, "Words");
    render_word_list(frame, chunks[1], &app.store.words, view, " My Words ");
    render_controls(frame, chunks[2], hints(view, false));

    render_overlays(frame, area, app, &app.store.words, view);
}

/// Render one album's page.
pub fn render_album_page(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let Screen::AlbumPage(page) = &app.screen else {
        return;
    };

    let name = app
        .store
        .album(page.album_id)
        .map(|a| a.name.as_str())
        .unwrap_or("Album");
    let scoped = app.store.album_words(page.album_id);

    let chunks = layout(area);
    render_header(frame, chunks[0], app, name);
    render_word_list(frame, chunks[1], &scoped, &page.list, &format!(" {} ", name));
    render_controls(frame, chunks[2], hints(&page.list, true));

    render_overlays(frame, area, app, &scoped, &page.list);

    if let Some(modal) = &page.rename_modal {
        render_name_modal(frame, area, modal, " Rename Album ");
    }
}

fn layout(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Min(5),    // List
        Constraint::Length(2), // Controls
    ])
    .margin(1)
    .split(area)
}

fn hints(view: &WordListView, album: bool) -> &'static str {
    match (view.edit, album) {
        (true, false) => "Space select  ·  a all  ·  d delete  ·  e/Esc done",
        (true, true) => "Space select  ·  a all  ·  d remove  ·  r rename  ·  x delete album  ·  e/Esc done",
        (false, false) => "Enter view  ·  a add  ·  e edit  ·  Tab albums  ·  s sign out  ·  q quit",
        (false, true) => "Enter view  ·  a add  ·  e edit  ·  p play  ·  Esc back",
    }
}

fn render_word_list(
    frame: &mut Frame,
    area: Rect,
    words: &[WordDoc],
    view: &WordListView,
    title: &str,
) {
    let lines: Vec<Line> = if words.is_empty() {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "No words yet. Press [a] to add one.",
                Style::default().fg(Color::DarkGray),
            )),
        ]
    } else {
        words
            .iter()
            .enumerate()
            .map(|(i, word)| {
                let is_cursor = i == view.cursor;
                let prefix = if is_cursor { "> " } else { "  " };

                let style = if is_cursor {
                    Style::default().fg(Color::Yellow).bold()
                } else {
                    Style::default().fg(Color::White)
                };

                let mut spans = vec![Span::styled(prefix, style)];
                if view.edit {
                    let mark = if view.selected.contains(&word.id) {
                        "[x] "
                    } else {
                        "[ ] "
                    };
                    spans.push(Span::styled(mark, style));
                }
                spans.push(Span::styled(word.word.clone(), style));
                spans.push(Span::styled(
                    format!("  ({})", word.part_of_speech),
                    Style::default().fg(Color::DarkGray),
                ));

                Line::from(spans)
            })
            .collect()
    };

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title.to_string())
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );

    frame.render_widget(widget, area);
}

fn render_overlays(
    frame: &mut Frame,
    area: Rect,
    app: &ClientApp,
    words: &[WordDoc],
    view: &WordListView,
) {
    if let Some(id) = view.detail {
        if let Some(word) = app.store.word(id) {
            render_word_detail(frame, area, word);
        }
    }
    if let Some(confirm) = &view.confirm {
        render_confirm(frame, area, confirm, words, view);
    }
}

fn render_word_detail(frame: &mut Frame, area: Rect, word: &WordDoc) {
    let mut content = vec![
        Line::from(vec![
            Span::styled(word.word.clone(), Style::default().fg(Color::Yellow).bold()),
            Span::styled(
                format!("  {}", word.part_of_speech),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            word.definition.clone(),
            Style::default().fg(Color::White),
        )),
    ];

    if !word.synonyms.is_empty() {
        content.push(Line::from(""));
        content.push(Line::from(vec![
            Span::styled("Synonyms: ", Style::default().fg(Color::Green)),
            Span::styled(word.synonyms.join(", "), Style::default().fg(Color::White)),
        ]));
    }
    if !word.antonyms.is_empty() {
        content.push(Line::from(""));
        content.push(Line::from(vec![
            Span::styled("Antonyms: ", Style::default().fg(Color::Red)),
            Span::styled(word.antonyms.join(", "), Style::default().fg(Color::White)),
        ]));
    }
    if !word.notes.is_empty() {
        content.push(Line::from(""));
        content.push(Line::from(vec![
            Span::styled("Notes: ", Style::default().fg(Color::Cyan)),
            Span::styled(word.notes.clone(), Style::default().fg(Color::White)),
        ]));
    }

    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        "[Esc] close",
        Style::default().fg(Color::DarkGray),
    )));

    let modal = centered_rect(60, content.len() as u16 + 2, area);
    frame.render_widget(Clear, modal);

    let widget = Paragraph::new(content).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, modal);
}

fn render_confirm(
    frame: &mut Frame,
    area: Rect,
    confirm: &Confirm,
    words: &[WordDoc],
    view: &WordListView,
) {
    use crate::client::state::ConfirmKind;

    let selected = view.selected.len();
    let prompt = match confirm.kind {
        ConfirmKind::DeleteSelected => format!("Delete {} selected words?", selected),
        ConfirmKind::DeleteSelectedFromAlbum => {
            format!("Remove {} words from this album?", selected)
        }
        ConfirmKind::DeleteAlbum => format!("Delete this album ({} words)?", words.len()),
    };

    let options: Vec<Span> = confirm
        .kind
        .options()
        .iter()
        .enumerate()
        .map(|(i, opt)| {
            let style = if i == confirm.cursor {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };
            Span::styled(format!("  {}  ", opt), style)
        })
        .collect();

    let content = vec![
        Line::from(Span::styled(prompt, Style::default().fg(Color::White))),
        Line::from(""),
        Line::from(options),
    ];

    let modal = centered_rect(50, 5, area);
    frame.render_widget(Clear, modal);

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(widget, modal);
}

/// Single-line text input modal, shared with the albums tab.
pub(super) fn render_name_modal(frame: &mut Frame, area: Rect, modal: &NameModal, title: &str) {
    let mut content = vec![Line::from(vec![
        Span::styled(modal.input.clone(), Style::default().fg(Color::Yellow)),
        Span::styled("_", Style::default().fg(Color::Yellow)),
    ])];

    if let Some(err) = &modal.error {
        content.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        )));
    } else {
        content.push(Line::from(Span::styled(
            "[Enter] save  ·  [Esc] cancel",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let rect = centered_rect(50, 4, area);
    frame.render_widget(Clear, rect);

    let widget = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title.to_string())
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, rect);
}
