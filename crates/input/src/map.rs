//! Key mapping from terminal events to shell actions.

use crate::types::InputAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to shell actions.
pub fn handle_key_event(key: KeyEvent) -> Option<InputAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        // Cursor
        KeyCode::Left
        | KeyCode::Char('h')
        | KeyCode::Char('H')
        | KeyCode::Char('a')
        | KeyCode::Char('A') => Some(InputAction::MoveLeft),
        KeyCode::Right
        | KeyCode::Char('l')
        | KeyCode::Char('L')
        | KeyCode::Char('d')
        | KeyCode::Char('D') => Some(InputAction::MoveRight),
        KeyCode::Up
        | KeyCode::Char('k')
        | KeyCode::Char('K')
        | KeyCode::Char('w')
        | KeyCode::Char('W') => Some(InputAction::MoveUp),
        KeyCode::Down
        | KeyCode::Char('j')
        | KeyCode::Char('J')
        | KeyCode::Char('s')
        | KeyCode::Char('S') => Some(InputAction::MoveDown),

        // Actions
        KeyCode::Enter | KeyCode::Char(' ') => Some(InputAction::Confirm),
        KeyCode::Esc | KeyCode::Backspace => Some(InputAction::Back),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(InputAction::Restart),

        _ => None,
    }
}

/// Check if key should quit the game.
///
/// Not consulted while the name editor has focus, except for Ctrl+C.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q')) || is_interrupt(key)
}

/// Ctrl+C: quits from every screen, including while typing a name.
pub fn is_interrupt(key: KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}
