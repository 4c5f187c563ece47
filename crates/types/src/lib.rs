//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, tests).
//!
//! # Game Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Frame step of the shell loop (~60 FPS) |
//! | `REVEAL_DELAY_MS` | 400 | Both faces stay visible before a pair resolves |
//! | `SHAKE_STEP_MS` | 70 | Interval between mismatch shake steps |
//! | `WIN_FLASH_STEP_MS` | 100 | Interval between win flash steps |
//! | `RESULT_SCREEN_DELAY_MS` | 300 | Pause between a win and the leaderboard screen |
//!
//! # Scoring
//!
//! `score = max(0, BASE_SCORE + remaining * TIME_BONUS_PER_SEC - moves * MOVE_PENALTY)`
//!
//! # Examples
//!
//! ```
//! use neuro_quest_types::{Cell, InputAction, UrgencyTier};
//!
//! let cell = Cell::new(1, 2);
//! assert_eq!(cell.index(3), 5);
//! assert_eq!(Cell::from_index(5, 3), cell);
//!
//! assert_eq!(UrgencyTier::from_remaining(25), UrgencyTier::Normal);
//! assert_eq!(UrgencyTier::from_remaining(20), UrgencyTier::Warning);
//! assert_eq!(UrgencyTier::from_remaining(10), UrgencyTier::Critical);
//!
//! assert_eq!(InputAction::from_str("confirm"), Some(InputAction::Confirm));
//! ```

/// Fixed frame step of the shell loop in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Delay before a revealed pair is compared (both faces stay visible meanwhile)
pub const REVEAL_DELAY_MS: u32 = 400;

/// Number of alternating offsets in the mismatch shake
pub const SHAKE_STEPS: u8 = 6;

/// Interval between shake steps
pub const SHAKE_STEP_MS: u32 = 70;

/// Number of on/off steps in the win flash
pub const WIN_FLASH_STEPS: u8 = 6;

/// Interval between win flash steps
pub const WIN_FLASH_STEP_MS: u32 = 100;

/// Pause between the winning match and the leaderboard screen
pub const RESULT_SCREEN_DELAY_MS: u32 = 300;

/// Base points awarded for clearing a level
pub const BASE_SCORE: u32 = 1000;

/// Points per second left on the clock
pub const TIME_BONUS_PER_SEC: u32 = 10;

/// Points removed per move
pub const MOVE_PENALTY: u32 = 50;

/// Records kept per level
pub const LEADERBOARD_CAPACITY: usize = 5;

/// Number of levels in the standard catalog (ids are `1..=LEVEL_COUNT`)
pub const LEVEL_COUNT: u8 = 3;

/// Remaining seconds at or below which the clock turns to the warning tier
pub const WARNING_SECS: u32 = 20;

/// Remaining seconds at or below which the clock turns to the critical tier
pub const CRITICAL_SECS: u32 = 10;

/// Name used when the player never typed one
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// A grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: u8,
    pub col: u8,
}

impl Cell {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Row-major index for a grid with `cols` columns.
    pub fn index(&self, cols: u8) -> usize {
        (self.row as usize) * (cols as usize) + (self.col as usize)
    }

    pub fn from_index(index: usize, cols: u8) -> Self {
        let cols = cols.max(1) as usize;
        Self {
            row: (index / cols) as u8,
            col: (index % cols) as u8,
        }
    }
}

/// Index into a level's motif pool.
///
/// `MotifIndex::BLANK` is reserved for decks built from an empty pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MotifIndex(pub u16);

impl MotifIndex {
    pub const BLANK: MotifIndex = MotifIndex(u16::MAX);

    pub fn is_blank(&self) -> bool {
        *self == Self::BLANK
    }

    pub fn get(&self) -> usize {
        self.0 as usize
    }
}

/// Visible state of one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CardFace {
    #[default]
    FaceDown,
    FaceUp,
    Matched,
}

/// Lifecycle of a game session.
///
/// `Won` and `TimedOut` are terminal: nothing leaves them except building a
/// fresh session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Won,
    TimedOut,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Won | Phase::TimedOut)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::Won => "won",
            Phase::TimedOut => "timedOut",
        }
    }
}

/// Presentation banding of the remaining time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UrgencyTier {
    #[default]
    Normal,
    Warning,
    Critical,
}

impl UrgencyTier {
    pub fn from_remaining(remaining_secs: u32) -> Self {
        if remaining_secs <= CRITICAL_SECS {
            UrgencyTier::Critical
        } else if remaining_secs <= WARNING_SECS {
            UrgencyTier::Warning
        } else {
            UrgencyTier::Normal
        }
    }
}

/// Player intents produced by the input layer and consumed by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Move the cursor / selection up
    MoveUp,
    /// Move the cursor / selection down
    MoveDown,
    /// Move the cursor left (previous tab on the leaderboard)
    MoveLeft,
    /// Move the cursor right (next tab on the leaderboard)
    MoveRight,
    /// Activate the card under the cursor or pick the highlighted entry
    Confirm,
    /// Leave the current screen
    Back,
    /// Rebuild the current level with a fresh deck
    Restart,
}

impl InputAction {
    /// Parse action from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use neuro_quest_types::InputAction;
    ///
    /// assert_eq!(InputAction::from_str("moveLeft"), Some(InputAction::MoveLeft));
    /// assert_eq!(InputAction::from_str("RESTART"), Some(InputAction::Restart));
    /// assert_eq!(InputAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveup" => Some(InputAction::MoveUp),
            "movedown" => Some(InputAction::MoveDown),
            "moveleft" => Some(InputAction::MoveLeft),
            "moveright" => Some(InputAction::MoveRight),
            "confirm" => Some(InputAction::Confirm),
            "back" => Some(InputAction::Back),
            "restart" => Some(InputAction::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            InputAction::MoveUp => "moveUp",
            InputAction::MoveDown => "moveDown",
            InputAction::MoveLeft => "moveLeft",
            InputAction::MoveRight => "moveRight",
            InputAction::Confirm => "confirm",
            InputAction::Back => "back",
            InputAction::Restart => "restart",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_defaults() {
        assert_eq!(REVEAL_DELAY_MS, 400);
        assert_eq!(SHAKE_STEPS, 6);
        assert_eq!(SHAKE_STEP_MS, 70);
        assert_eq!(WIN_FLASH_STEPS, 6);
        assert_eq!(WIN_FLASH_STEP_MS, 100);
        assert_eq!(RESULT_SCREEN_DELAY_MS, 300);
    }

    #[test]
    fn scoring_constants() {
        assert_eq!(BASE_SCORE, 1000);
        assert_eq!(TIME_BONUS_PER_SEC, 10);
        assert_eq!(MOVE_PENALTY, 50);
        assert_eq!(LEADERBOARD_CAPACITY, 5);
    }

    #[test]
    fn cell_index_round_trips_row_major() {
        for index in 0..20 {
            let cell = Cell::from_index(index, 5);
            assert_eq!(cell.index(5), index);
        }
        assert_eq!(Cell::from_index(7, 3), Cell::new(2, 1));
    }

    #[test]
    fn urgency_tier_boundaries() {
        assert_eq!(UrgencyTier::from_remaining(80), UrgencyTier::Normal);
        assert_eq!(UrgencyTier::from_remaining(21), UrgencyTier::Normal);
        assert_eq!(UrgencyTier::from_remaining(20), UrgencyTier::Warning);
        assert_eq!(UrgencyTier::from_remaining(11), UrgencyTier::Warning);
        assert_eq!(UrgencyTier::from_remaining(10), UrgencyTier::Critical);
        assert_eq!(UrgencyTier::from_remaining(0), UrgencyTier::Critical);
    }

    #[test]
    fn terminal_phases() {
        assert!(!Phase::Idle.is_terminal());
        assert!(!Phase::Running.is_terminal());
        assert!(Phase::Won.is_terminal());
        assert!(Phase::TimedOut.is_terminal());
    }

    #[test]
    fn blank_motif_is_reserved() {
        assert!(MotifIndex::BLANK.is_blank());
        assert!(!MotifIndex(0).is_blank());
    }

    #[test]
    fn input_action_string_round_trip() {
        for action in [
            InputAction::MoveUp,
            InputAction::MoveDown,
            InputAction::MoveLeft,
            InputAction::MoveRight,
            InputAction::Confirm,
            InputAction::Back,
            InputAction::Restart,
        ] {
            assert_eq!(InputAction::from_str(action.as_str()), Some(action));
        }
    }
}
