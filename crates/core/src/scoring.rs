//! Scoring module - end-of-level score and time taken
//!
//! `score = max(0, BASE_SCORE + remaining * TIME_BONUS_PER_SEC - moves * MOVE_PENALTY)`
//!
//! The score is only computed when a level is won; running out of time never
//! produces one.

use crate::types::{BASE_SCORE, MOVE_PENALTY, TIME_BONUS_PER_SEC};

/// Score calculation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    pub base: u32,
    pub time_bonus: u32,
    pub move_penalty: u32,
    /// Clamped at zero.
    pub total: u32,
}

/// Calculate the score for a won level.
pub fn calculate_score(remaining_secs: u32, moves: u32) -> ScoreResult {
    let time_bonus = remaining_secs.saturating_mul(TIME_BONUS_PER_SEC);
    let move_penalty = moves.saturating_mul(MOVE_PENALTY);
    let total = BASE_SCORE
        .saturating_add(time_bonus)
        .saturating_sub(move_penalty);

    ScoreResult {
        base: BASE_SCORE,
        time_bonus,
        move_penalty,
        total,
    }
}

/// Seconds spent on the level.
pub fn time_taken(limit_secs: u32, remaining_secs: u32) -> u32 {
    limit_secs.saturating_sub(remaining_secs)
}
