//! Single-line editor for the player name.
//!
//! Commas are refused outright: the leaderboard line format has no escaping,
//! so a name with a comma would not survive a reload.

use arrayvec::ArrayString;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Maximum name length in bytes.
pub const NAME_CAPACITY: usize = 16;

/// Why a key or a submission was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Enter on a blank name.
    Empty,
    /// The comma key.
    Comma,
    /// No room left.
    Full,
}

/// Outcome of one key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEvent {
    Changed,
    Submitted,
    Cancelled,
    Rejected(Rejection),
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct TextInput {
    buf: ArrayString<NAME_CAPACITY>,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fill with `text`, dropping commas and anything past capacity.
    pub fn with_text(text: &str) -> Self {
        let mut input = Self::new();
        input.set_text(text);
        input
    }

    pub fn set_text(&mut self, text: &str) {
        self.buf.clear();
        for c in text.chars().filter(|c| *c != ',' && !c.is_control()) {
            if self.buf.try_push(c).is_err() {
                break;
            }
        }
    }

    pub fn as_str(&self) -> &str {
        self.buf.as_str()
    }

    /// The name as it would be submitted.
    pub fn value(&self) -> &str {
        self.buf.trim()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn handle_key_press(&mut self, key: KeyEvent) -> TextEvent {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return TextEvent::Ignored;
        }
        match key.code {
            KeyCode::Enter => {
                if self.value().is_empty() {
                    TextEvent::Rejected(Rejection::Empty)
                } else {
                    TextEvent::Submitted
                }
            }
            KeyCode::Esc => TextEvent::Cancelled,
            KeyCode::Backspace => match self.buf.pop() {
                Some(_) => TextEvent::Changed,
                None => TextEvent::Ignored,
            },
            KeyCode::Char(',') => TextEvent::Rejected(Rejection::Comma),
            KeyCode::Char(c) if !c.is_control() => match self.buf.try_push(c) {
                Ok(()) => TextEvent::Changed,
                Err(_) => TextEvent::Rejected(Rejection::Full),
            },
            _ => TextEvent::Ignored,
        }
    }
}
