//! Client UI rendering.

mod add_word;
mod albums;
mod auth;
mod quiz;
mod render;
mod words;

pub use render::render;
