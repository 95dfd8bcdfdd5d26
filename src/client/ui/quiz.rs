//! The quiz screen.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};

use crate::client::state::{ClientApp, Screen};
use crate::quiz::{QuizGame, Round};

use super::render::{render_controls, render_header};

/// Render the quiz screen.
pub fn render(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let Screen::Quiz(view) = &app.screen else {
        return;
    };

    let title = match view.album_id.and_then(|id| app.store.album(id)) {
        Some(album) => format!("Quiz: {}", album.name),
        None => "Quiz".to_string(),
    };

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Min(5),    // Body
        Constraint::Length(2), // Controls
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0], app, &title);

    match &view.game {
        None => {
            let words = match view.album_id {
                Some(id) => app.store.album_words(id),
                None => app.store.words.clone(),
            };
            render_start(frame, chunks[1], crate::quiz::has_enough_words(&words));
            let hints = if view.album_id.is_none() {
                "[Enter] start  ·  [Tab] words  ·  [Esc] back  ·  q quit"
            } else {
                "[Enter] start  ·  [Esc] back  ·  q quit"
            };
            render_controls(frame, chunks[2], hints);
        }
        Some(game) if game.is_over() => {
            render_game_over(frame, chunks[1], game);
            render_controls(frame, chunks[2], "[r] play again  ·  [Esc] back  ·  q quit");
        }
        Some(game) => {
            render_game(frame, chunks[1], game, view.cursor);
            let resolved = game.round().is_some_and(Round::is_resolved);
            let hints = if resolved {
                "[Enter] next  ·  [Esc] back  ·  q quit"
            } else {
                "j/k select  ·  [Enter] guess  ·  [Esc] back  ·  q quit"
            };
            render_controls(frame, chunks[2], hints);
        }
    }
}

fn render_start(frame: &mut Frame, area: Rect, enough: bool) {
    let content = if enough {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "Guess the word from its definition.",
                Style::default().fg(Color::White),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press [Enter] to start",
                Style::default().fg(Color::Yellow).bold(),
            )),
        ]
    } else {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "Not enough words to play.",
                Style::default().fg(Color::Red),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Add at least 4 different words first.",
                Style::default().fg(Color::DarkGray),
            )),
        ]
    };

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

fn render_game(frame: &mut Frame, area: Rect, game: &QuizGame, cursor: usize) {
    let Some(round) = game.round() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1), // Score line
        Constraint::Length(6), // Definition
        Constraint::Min(6),    // Choices
    ])
    .split(area);

    let score_line = format!(
        "Score: {}/{}   Remaining: {}",
        game.score(),
        game.attempts(),
        game.remaining()
    );
    let widget = Paragraph::new(score_line)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan).bold());
    frame.render_widget(widget, chunks[0]);

    let definition = Paragraph::new(round.definition.clone())
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Which word means ")
                .title_style(Style::default().fg(Color::Cyan))
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(definition, chunks[1]);

    render_choices(frame, chunks[2], round, cursor);
}

fn render_choices(frame: &mut Frame, area: Rect, round: &Round, cursor: usize) {
    let lines: Vec<Line> = round
        .choices
        .iter()
        .enumerate()
        .map(|(i, choice)| {
            let is_cursor = i == cursor && !round.is_resolved();
            let prefix = if is_cursor { "> " } else { "  " };

            // Revealed guesses stay colored for the rest of the round.
            let style = if round.is_revealed(i) {
                if i == round.correct_index {
                    Style::default().fg(Color::Green).bold()
                } else {
                    Style::default().fg(Color::Red)
                }
            } else if is_cursor {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };

            Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(choice.clone(), style),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Choices ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_game_over(frame: &mut Frame, area: Rect, game: &QuizGame) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Round complete!",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("You scored {} out of {}", game.score(), game.attempts()),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{}%", game.percentage()),
            Style::default().fg(Color::Yellow).bold(),
        )),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, area);
}
