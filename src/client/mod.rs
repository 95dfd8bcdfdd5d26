//! Wordbook client module.
//!
//! Provides the WebSocket-based TUI client: auth screens, the word and
//! album tabs, the add-word form, and the quiz.

mod client;
mod state;
mod ui;

pub use client::run;
