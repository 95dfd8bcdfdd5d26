//! Sign-in and create-account screens.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::client::state::{AuthField, ClientApp, Screen};

/// Render whichever auth form is showing.
pub fn render(frame: &mut Frame, area: Rect, app: &ClientApp) {
    match &app.screen {
        Screen::SignIn(form) => render_form(
            frame,
            area,
            "Sign in",
            &[
                ("Email", form.email.as_str(), false, form.focus == AuthField::Email),
                (
                    "Password",
                    form.password.as_str(),
                    true,
                    form.focus == AuthField::Password,
                ),
            ],
            form.error.as_deref(),
            "[Enter] sign in  ·  [Tab] create account  ·  [Esc] quit",
        ),
        Screen::SignUp(form) => render_form(
            frame,
            area,
            "Create account",
            &[
                ("Email", form.email.as_str(), false, form.focus == AuthField::Email),
                (
                    "Password",
                    form.password.as_str(),
                    true,
                    form.focus == AuthField::Password,
                ),
                (
                    "Confirm",
                    form.confirm.as_str(),
                    true,
                    form.focus == AuthField::Confirm,
                ),
            ],
            form.error.as_deref(),
            "[Enter] create  ·  [Tab] back to sign in",
        ),
        _ => {}
    }
}

fn render_form(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    fields: &[(&str, &str, bool, bool)],
    error: Option<&str>,
    hints: &str,
) {
    let chunks = Layout::vertical([
        Constraint::Percentage(30),
        Constraint::Length(7 + fields.len() as u16 * 2),
        Constraint::Percentage(30),
    ])
    .split(area);

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "WORDBOOK",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(title, Style::default().fg(Color::White).bold())),
        Line::from(""),
    ];

    for (label, value, masked, focused) in fields {
        let shown = if *masked {
            "*".repeat(value.chars().count())
        } else {
            (*value).to_string()
        };
        let style = if *focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };
        let cursor = if *focused { "_" } else { " " };

        content.push(Line::from(vec![
            Span::styled(format!("{:>9}: ", label), Style::default().fg(Color::White)),
            Span::styled(shown, style),
            Span::styled(cursor, style),
        ]));
        content.push(Line::from(""));
    }

    if let Some(err) = error {
        content.push(Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(Color::Red),
        )));
    } else {
        content.push(Line::from(""));
    }

    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        hints.to_string(),
        Style::default().fg(Color::DarkGray),
    )));

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, chunks[1]);
}
