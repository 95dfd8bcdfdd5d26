//! # wordbook
//!
//! A vocabulary notebook for the terminal.
//!
//! Words are looked up against a public dictionary service, stored as
//! documents on a small WebSocket document-store server, organized into
//! named albums, and drilled with a multiple-choice quiz built from the
//! user's own word list. Every client signed into the same account
//! receives live snapshots of the word and album collections whenever
//! anything changes.
//!
//! ## Usage
//!
//! Start the store server:
//!
//! ```sh
//! wordbook serve --data words.json
//! ```
//!
//! Then connect one or more clients:
//!
//! ```sh
//! wordbook connect --host my.server
//! ```

pub mod client;
pub mod dictionary;
pub mod models;
pub mod protocol;
pub mod quiz;
pub mod server;
pub mod terminal;

pub use models::{Album, WordDoc, WordDraft};
pub use quiz::QuizGame;
