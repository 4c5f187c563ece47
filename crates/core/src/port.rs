//! Presentation port - what a session tells the UI
//!
//! Sessions never draw or play sounds; they report state changes through this
//! trait and the front-end decides how to show them.

use crate::types::{CardFace, Cell, UrgencyTier};

pub trait PresentationPort {
    fn on_card_changed(&mut self, cell: Cell, face: CardFace);
    fn on_move_count_changed(&mut self, moves: u32);
    fn on_time_changed(&mut self, remaining_secs: u32, tier: UrgencyTier);
    fn on_match_cue(&mut self);
    fn on_mismatch_cue(&mut self);
    /// `offset_sign` alternates +1 / -1 and is 0 on the final step, which puts
    /// the cards back in place.
    fn on_shake_step(&mut self, cells: [Cell; 2], offset_sign: i8);
    fn on_win(&mut self, score: u32, moves: u32, time_taken_secs: u32);
    fn on_timeout(&mut self);

    fn on_win_flash(&mut self, _lit: bool) {}

    /// A fresh board of `rows` x `cols` face-down cards is about to start.
    fn on_board_reset(&mut self, _rows: u8, _cols: u8) {}
}

/// One port callback, as data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationEvent {
    CardChanged(Cell, CardFace),
    MoveCountChanged(u32),
    TimeChanged(u32, UrgencyTier),
    MatchCue,
    MismatchCue,
    ShakeStep([Cell; 2], i8),
    Win {
        score: u32,
        moves: u32,
        time_taken_secs: u32,
    },
    Timeout,
    WinFlash(bool),
}

/// Port that records every event (tests, replays in benches).
#[derive(Debug, Clone, Default)]
pub struct RecordingPort {
    pub events: Vec<PresentationEvent>,
}

impl RecordingPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<PresentationEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn count(&self, pred: impl Fn(&PresentationEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl PresentationPort for RecordingPort {
    fn on_card_changed(&mut self, cell: Cell, face: CardFace) {
        self.events.push(PresentationEvent::CardChanged(cell, face));
    }

    fn on_move_count_changed(&mut self, moves: u32) {
        self.events.push(PresentationEvent::MoveCountChanged(moves));
    }

    fn on_time_changed(&mut self, remaining_secs: u32, tier: UrgencyTier) {
        self.events
            .push(PresentationEvent::TimeChanged(remaining_secs, tier));
    }

    fn on_match_cue(&mut self) {
        self.events.push(PresentationEvent::MatchCue);
    }

    fn on_mismatch_cue(&mut self) {
        self.events.push(PresentationEvent::MismatchCue);
    }

    fn on_shake_step(&mut self, cells: [Cell; 2], offset_sign: i8) {
        self.events
            .push(PresentationEvent::ShakeStep(cells, offset_sign));
    }

    fn on_win(&mut self, score: u32, moves: u32, time_taken_secs: u32) {
        self.events.push(PresentationEvent::Win {
            score,
            moves,
            time_taken_secs,
        });
    }

    fn on_timeout(&mut self) {
        self.events.push(PresentationEvent::Timeout);
    }

    fn on_win_flash(&mut self, lit: bool) {
        self.events.push(PresentationEvent::WinFlash(lit));
    }
}

/// Port that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPort;

impl PresentationPort for NullPort {
    fn on_card_changed(&mut self, _cell: Cell, _face: CardFace) {}
    fn on_move_count_changed(&mut self, _moves: u32) {}
    fn on_time_changed(&mut self, _remaining_secs: u32, _tier: UrgencyTier) {}
    fn on_match_cue(&mut self) {}
    fn on_mismatch_cue(&mut self) {}
    fn on_shake_step(&mut self, _cells: [Cell; 2], _offset_sign: i8) {}
    fn on_win(&mut self, _score: u32, _moves: u32, _time_taken_secs: u32) {}
    fn on_timeout(&mut self) {}
}
