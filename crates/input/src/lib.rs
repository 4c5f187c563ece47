//! Terminal input module.
//!
//! Independent of any UI framework. It maps `crossterm` key events into
//! [`crate::types::InputAction`] for menus and the board, and provides a small
//! line editor for the player name.

pub mod handler;
pub mod map;

pub use neuro_quest_types as types;

pub use handler::{Rejection, TextEvent, TextInput, NAME_CAPACITY};
pub use map::{handle_key_event, is_interrupt, should_quit};
