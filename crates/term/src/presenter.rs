//! Terminal side of the presentation port.
//!
//! Keeps the transient, purely visual state the session reports (shake
//! offsets, cue banners, win flash, clock colour) for the board view to draw.
//! Audio cues become short banners; the board itself is drawn from snapshots.

use crate::core::PresentationPort;
use crate::types::{CardFace, Cell, UrgencyTier};

/// How long a match/mismatch banner stays up.
pub const CUE_VISIBLE_MS: u32 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Match,
    Mismatch,
    Timeout,
}

impl Cue {
    pub fn label(&self) -> &'static str {
        match self {
            Cue::Match => "Match!",
            Cue::Mismatch => "No match",
            Cue::Timeout => "Time's up!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinSummary {
    pub score: u32,
    pub moves: u32,
    pub time_taken_secs: u32,
}

#[derive(Debug, Clone, Default)]
pub struct TerminalPresenter {
    cols: u8,
    /// Horizontal shake offset per cell, row-major.
    offsets: Vec<i8>,
    cue: Option<(Cue, u32)>,
    flash_lit: bool,
    remaining_secs: u32,
    tier: UrgencyTier,
    moves: u32,
    win: Option<WinSummary>,
    /// Bumped on every callback; feeds the render throttle fingerprint.
    revision: u64,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Age the cue banner.
    pub fn advance(&mut self, elapsed_ms: u32) {
        if let Some((cue, left)) = self.cue {
            let left = left.saturating_sub(elapsed_ms);
            self.cue = (left > 0).then_some((cue, left));
            if left == 0 {
                self.revision += 1;
            }
        }
    }

    pub fn shake_offset(&self, cell: Cell) -> i8 {
        self.offsets
            .get(cell.index(self.cols))
            .copied()
            .unwrap_or(0)
    }

    pub fn cue(&self) -> Option<Cue> {
        self.cue.map(|(cue, _)| cue)
    }

    pub fn flash_lit(&self) -> bool {
        self.flash_lit
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn tier(&self) -> UrgencyTier {
        self.tier
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn win(&self) -> Option<WinSummary> {
        self.win
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn show_cue(&mut self, cue: Cue) {
        self.cue = Some((cue, CUE_VISIBLE_MS));
    }

    fn set_offset(&mut self, cell: Cell, offset: i8) {
        let i = cell.index(self.cols);
        if let Some(slot) = self.offsets.get_mut(i) {
            *slot = offset;
        }
    }
}

impl PresentationPort for TerminalPresenter {
    fn on_board_reset(&mut self, rows: u8, cols: u8) {
        *self = Self {
            cols,
            offsets: vec![0; rows as usize * cols as usize],
            revision: self.revision + 1,
            ..Self::default()
        };
    }

    fn on_card_changed(&mut self, cell: Cell, face: CardFace) {
        if face == CardFace::FaceDown {
            self.set_offset(cell, 0);
        }
        self.revision += 1;
    }

    fn on_move_count_changed(&mut self, moves: u32) {
        self.moves = moves;
        self.revision += 1;
    }

    fn on_time_changed(&mut self, remaining_secs: u32, tier: UrgencyTier) {
        self.remaining_secs = remaining_secs;
        self.tier = tier;
        self.revision += 1;
    }

    fn on_match_cue(&mut self) {
        self.show_cue(Cue::Match);
        self.revision += 1;
    }

    fn on_mismatch_cue(&mut self) {
        self.show_cue(Cue::Mismatch);
        self.revision += 1;
    }

    fn on_shake_step(&mut self, cells: [Cell; 2], offset_sign: i8) {
        for cell in cells {
            self.set_offset(cell, offset_sign.signum());
        }
        self.revision += 1;
    }

    fn on_win(&mut self, score: u32, moves: u32, time_taken_secs: u32) {
        self.win = Some(WinSummary {
            score,
            moves,
            time_taken_secs,
        });
        self.revision += 1;
    }

    fn on_timeout(&mut self) {
        self.show_cue(Cue::Timeout);
        self.revision += 1;
    }

    fn on_win_flash(&mut self, lit: bool) {
        self.flash_lit = lit;
        self.revision += 1;
    }
}
