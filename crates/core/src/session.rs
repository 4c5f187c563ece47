//! Game session - one play-through of one level
//!
//! The session owns the deck, the card faces, the clock and the move counter.
//! Every transition is a method call; delays are queued on the shell's
//! [`Scheduler`] tagged with the session's generation, and every visible change
//! is reported through a [`PresentationPort`].
//!
//! ```text
//! Idle --start--> Running --all matched--> Won
//!                    |
//!                    +--remaining hits 0--> TimedOut
//! ```
//!
//! Won and TimedOut are absorbing: activations, ticks and resolutions are
//! ignored once reached (the win flash still plays out).

use arrayvec::ArrayVec;

use crate::deck::Deck;
use crate::leaderboard::ScoreRecord;
use crate::port::PresentationPort;
use crate::scheduler::{Deferred, Scheduler};
use crate::scoring::{calculate_score, time_taken};
use crate::snapshot::{CellSnapshot, SessionSnapshot};
use crate::theme::LevelConfig;
use crate::types::{
    CardFace, Cell, MotifIndex, Phase, UrgencyTier, REVEAL_DELAY_MS, SHAKE_STEPS, SHAKE_STEP_MS,
    WIN_FLASH_STEPS, WIN_FLASH_STEP_MS,
};

#[derive(Debug, Clone)]
pub struct GameSession {
    level: LevelConfig,
    deck: Deck,
    faces: Vec<CardFace>,
    matched: usize,
    /// Face-up cards waiting to be compared (at most two).
    pending: ArrayVec<Cell, 2>,
    moves: u32,
    remaining_secs: u32,
    /// Set while a pair is being resolved or shaken back.
    locked: bool,
    phase: Phase,
    generation: u32,
    player_name: String,
    final_score: Option<u32>,
    /// Finished record, consumed by the shell.
    result: Option<ScoreRecord>,
}

impl GameSession {
    /// Create an idle session. The grid comes from `deck`; the level supplies
    /// the id and time limit.
    pub fn new(
        level: LevelConfig,
        deck: Deck,
        player_name: impl Into<String>,
        generation: u32,
    ) -> Self {
        let faces = vec![CardFace::FaceDown; deck.len()];
        Self {
            remaining_secs: level.time_limit_secs,
            level,
            deck,
            faces,
            matched: 0,
            pending: ArrayVec::new(),
            moves: 0,
            locked: false,
            phase: Phase::Idle,
            generation,
            player_name: player_name.into(),
            final_score: None,
            result: None,
        }
    }

    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn urgency(&self) -> UrgencyTier {
        UrgencyTier::from_remaining(self.remaining_secs)
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn pending(&self) -> &[Cell] {
        &self.pending
    }

    pub fn matched_count(&self) -> usize {
        self.matched
    }

    pub fn final_score(&self) -> Option<u32> {
        self.final_score
    }

    pub fn face_at(&self, cell: Cell) -> Option<CardFace> {
        self.index_of(cell).map(|i| self.faces[i])
    }

    /// Motif under `cell`, only while the card shows its face.
    pub fn revealed_motif(&self, cell: Cell) -> Option<MotifIndex> {
        let i = self.index_of(cell)?;
        match self.faces[i] {
            CardFace::FaceDown => None,
            CardFace::FaceUp | CardFace::Matched => self.deck.motifs().get(i).copied(),
        }
    }

    /// Take the record of a won session (only once).
    pub fn take_result(&mut self) -> Option<ScoreRecord> {
        self.result.take()
    }

    /// Begin the countdown.
    pub fn start(&mut self, port: &mut impl PresentationPort) -> bool {
        if self.phase != Phase::Idle {
            tracing::trace!(phase = self.phase.as_str(), "start ignored");
            return false;
        }
        self.phase = Phase::Running;
        self.remaining_secs = self.level.time_limit_secs;
        tracing::debug!(
            level = self.level.id,
            generation = self.generation,
            limit = self.remaining_secs,
            "session started"
        );
        port.on_board_reset(self.deck.rows(), self.deck.cols());
        port.on_time_changed(self.remaining_secs, self.urgency());
        true
    }

    /// Update the clock from the total seconds elapsed since start.
    ///
    /// Returns true if the remaining time changed.
    pub fn tick(&mut self, elapsed_secs: u32, port: &mut impl PresentationPort) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        let remaining = self
            .level
            .time_limit_secs
            .saturating_sub(elapsed_secs)
            .min(self.remaining_secs);
        if remaining == self.remaining_secs {
            return false;
        }

        self.remaining_secs = remaining;
        port.on_time_changed(remaining, self.urgency());

        if remaining == 0 {
            self.phase = Phase::TimedOut;
            self.locked = true;
            tracing::debug!(
                level = self.level.id,
                moves = self.moves,
                "session timed out"
            );
            port.on_timeout();
        }
        true
    }

    /// Flip a face-down card. The second card of a pair locks the board and
    /// queues the comparison.
    pub fn activate(
        &mut self,
        cell: Cell,
        sched: &mut Scheduler,
        port: &mut impl PresentationPort,
    ) -> bool {
        if self.phase != Phase::Running || self.locked {
            tracing::trace!(?cell, locked = self.locked, "activate ignored");
            return false;
        }
        let Some(i) = self.index_of(cell) else {
            return false;
        };
        if self.faces[i] != CardFace::FaceDown || self.pending.is_full() {
            return false;
        }

        self.faces[i] = CardFace::FaceUp;
        self.pending.push(cell);
        port.on_card_changed(cell, CardFace::FaceUp);

        if self.pending.is_full() {
            self.locked = true;
            sched.schedule(self.generation, REVEAL_DELAY_MS, Deferred::Resolve);
        }
        true
    }

    /// Compare the two pending cards and count the move.
    pub fn resolve(&mut self, sched: &mut Scheduler, port: &mut impl PresentationPort) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        let Some(cells) = self.pending_pair() else {
            return false;
        };

        self.moves += 1;
        port.on_move_count_changed(self.moves);

        let [a, b] = cells;
        if self.deck.motif_at(a) == self.deck.motif_at(b) {
            for cell in cells {
                self.set_face(cell, CardFace::Matched);
                port.on_card_changed(cell, CardFace::Matched);
            }
            self.matched += 2;
            self.pending.clear();
            self.locked = false;
            port.on_match_cue();

            if self.matched == self.faces.len() {
                self.win(sched, port);
            }
        } else {
            port.on_mismatch_cue();
            self.shake_step(0, sched, port);
        }
        true
    }

    /// Run a task this session queued earlier.
    pub fn run_deferred(
        &mut self,
        kind: Deferred,
        sched: &mut Scheduler,
        port: &mut impl PresentationPort,
    ) -> bool {
        match kind {
            Deferred::Resolve => self.resolve(sched, port),
            Deferred::ShakeStep(step) => self.shake_step(step, sched, port),
            Deferred::WinFlash(step) => self.win_flash_step(step, sched, port),
        }
    }

    /// Run every outstanding task of this session right away, in due order.
    pub fn settle(&mut self, sched: &mut Scheduler, port: &mut impl PresentationPort) {
        while let Some(task) = sched.pop_next_for(self.generation) {
            self.run_deferred(task.kind, sched, port);
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut out = SessionSnapshot::default();
        self.snapshot_into(&mut out);
        out
    }

    /// Fill `out` in place, reusing its cell buffer.
    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        out.level_id = self.level.id;
        out.rows = self.deck.rows();
        out.cols = self.deck.cols();
        out.cells.clear();
        out.cells
            .extend(self.faces.iter().zip(self.deck.motifs()).map(|(&face, &motif)| {
                CellSnapshot {
                    face,
                    motif: (face != CardFace::FaceDown).then_some(motif),
                }
            }));
        out.moves = self.moves;
        out.remaining_secs = self.remaining_secs;
        out.time_limit_secs = self.level.time_limit_secs;
        out.tier = self.urgency();
        out.phase = self.phase;
        out.locked = self.locked;
        out.matched_pairs = (self.matched / 2) as u32;
        out.total_pairs = (self.faces.len() / 2) as u32;
        out.final_score = self.final_score;
        out.player_name.clear();
        out.player_name.push_str(&self.player_name);
    }

    fn index_of(&self, cell: Cell) -> Option<usize> {
        if cell.row >= self.deck.rows() || cell.col >= self.deck.cols() {
            return None;
        }
        let i = cell.index(self.deck.cols());
        (i < self.faces.len()).then_some(i)
    }

    fn set_face(&mut self, cell: Cell, face: CardFace) {
        if let Some(i) = self.index_of(cell) {
            self.faces[i] = face;
        }
    }

    fn pending_pair(&self) -> Option<[Cell; 2]> {
        match self.pending.as_slice() {
            &[a, b] => Some([a, b]),
            _ => None,
        }
    }

    fn win(&mut self, sched: &mut Scheduler, port: &mut impl PresentationPort) {
        self.phase = Phase::Won;
        let score = calculate_score(self.remaining_secs, self.moves).total;
        let taken = time_taken(self.level.time_limit_secs, self.remaining_secs);
        self.final_score = Some(score);
        self.result = Some(ScoreRecord::new(
            score,
            taken,
            self.moves,
            self.player_name.clone(),
        ));
        tracing::info!(
            level = self.level.id,
            score,
            moves = self.moves,
            time_taken = taken,
            "level won"
        );
        port.on_win(score, self.moves, taken);
        self.win_flash_step(0, sched, port);
    }

    fn shake_step(
        &mut self,
        step: u8,
        sched: &mut Scheduler,
        port: &mut impl PresentationPort,
    ) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        let Some(cells) = self.pending_pair() else {
            return false;
        };

        if step < SHAKE_STEPS {
            let sign = if step % 2 == 0 { 1 } else { -1 };
            port.on_shake_step(cells, sign);
            sched.schedule(self.generation, SHAKE_STEP_MS, Deferred::ShakeStep(step + 1));
            return true;
        }

        port.on_shake_step(cells, 0);
        for cell in cells {
            self.set_face(cell, CardFace::FaceDown);
            port.on_card_changed(cell, CardFace::FaceDown);
        }
        self.pending.clear();
        self.locked = false;
        true
    }

    fn win_flash_step(
        &mut self,
        step: u8,
        sched: &mut Scheduler,
        port: &mut impl PresentationPort,
    ) -> bool {
        if self.phase != Phase::Won || step >= WIN_FLASH_STEPS {
            return false;
        }
        port.on_win_flash(step % 2 == 0);
        if step + 1 < WIN_FLASH_STEPS {
            sched.schedule(self.generation, WIN_FLASH_STEP_MS, Deferred::WinFlash(step + 1));
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{PresentationEvent, RecordingPort};
    use crate::theme::ThemeCatalog;

    /// 2x2 board: (0,0)+(1,1) hold motif 0, (0,1)+(1,0) hold motif 1.
    fn small_session(limit: u32) -> GameSession {
        let base = ThemeCatalog::standard().levels()[0];
        let level = LevelConfig {
            rows: 2,
            cols: 2,
            time_limit_secs: limit,
            ..base
        };
        let deck = Deck::from_motifs(
            2,
            2,
            vec![MotifIndex(0), MotifIndex(1), MotifIndex(1), MotifIndex(0)],
        );
        GameSession::new(level, deck, "Ann", 7)
    }

    fn running(limit: u32) -> (GameSession, Scheduler, RecordingPort) {
        let mut s = small_session(limit);
        let mut port = RecordingPort::new();
        assert!(s.start(&mut port));
        port.take();
        (s, Scheduler::new(), port)
    }

    const A: Cell = Cell::new(0, 0);
    const B: Cell = Cell::new(0, 1);
    const C: Cell = Cell::new(1, 0);
    const D: Cell = Cell::new(1, 1);

    #[test]
    fn test_new_session_is_idle() {
        let s = small_session(40);
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.moves(), 0);
        assert_eq!(s.remaining_secs(), 40);
        assert!(!s.is_locked());
        assert_eq!(s.face_at(A), Some(CardFace::FaceDown));
        assert_eq!(s.generation(), 7);
    }

    #[test]
    fn test_start_once() {
        let mut s = small_session(40);
        let mut port = RecordingPort::new();
        assert!(s.start(&mut port));
        assert!(!s.start(&mut port));
        assert_eq!(
            port.events,
            vec![PresentationEvent::TimeChanged(40, UrgencyTier::Normal)]
        );
    }

    #[test]
    fn test_activate_requires_running() {
        let mut s = small_session(40);
        let mut sched = Scheduler::new();
        let mut port = RecordingPort::new();
        assert!(!s.activate(A, &mut sched, &mut port));
        assert!(port.events.is_empty());
    }

    #[test]
    fn test_first_activation_reveals() {
        let (mut s, mut sched, mut port) = running(40);
        assert!(s.activate(A, &mut sched, &mut port));
        assert_eq!(s.face_at(A), Some(CardFace::FaceUp));
        assert_eq!(s.pending(), &[A]);
        assert!(!s.is_locked());
        assert!(sched.is_empty());
        assert_eq!(port.events, vec![PresentationEvent::CardChanged(A, CardFace::FaceUp)]);
        assert_eq!(s.revealed_motif(A), Some(MotifIndex(0)));
        assert_eq!(s.revealed_motif(B), None);
    }

    #[test]
    fn test_second_activation_locks_and_schedules() {
        let (mut s, mut sched, mut port) = running(40);
        s.activate(A, &mut sched, &mut port);
        assert!(s.activate(B, &mut sched, &mut port));
        assert!(s.is_locked());
        assert_eq!(s.pending().len(), 2);
        assert_eq!(sched.pending(7), 1);
        assert_eq!(sched.next_due_ms(), Some(REVEAL_DELAY_MS as u64));

        // Third card refused while locked.
        assert!(!s.activate(C, &mut sched, &mut port));
        assert_eq!(s.face_at(C), Some(CardFace::FaceDown));
    }

    #[test]
    fn test_activate_same_card_twice_is_noop() {
        let (mut s, mut sched, mut port) = running(40);
        s.activate(A, &mut sched, &mut port);
        assert!(!s.activate(A, &mut sched, &mut port));
        assert_eq!(s.pending(), &[A]);
    }

    #[test]
    fn test_activate_out_of_range_is_noop() {
        let (mut s, mut sched, mut port) = running(40);
        assert!(!s.activate(Cell::new(2, 0), &mut sched, &mut port));
        assert!(!s.activate(Cell::new(0, 9), &mut sched, &mut port));
        assert!(port.events.is_empty());
    }

    #[test]
    fn test_match_marks_cards_and_unlocks() {
        let (mut s, mut sched, mut port) = running(40);
        s.activate(A, &mut sched, &mut port);
        s.activate(D, &mut sched, &mut port);
        port.take();

        s.settle(&mut sched, &mut port);
        assert_eq!(s.face_at(A), Some(CardFace::Matched));
        assert_eq!(s.face_at(D), Some(CardFace::Matched));
        assert_eq!(s.moves(), 1);
        assert!(!s.is_locked());
        assert!(s.pending().is_empty());
        assert_eq!(s.matched_count(), 2);
        assert_eq!(
            port.events,
            vec![
                PresentationEvent::MoveCountChanged(1),
                PresentationEvent::CardChanged(A, CardFace::Matched),
                PresentationEvent::CardChanged(D, CardFace::Matched),
                PresentationEvent::MatchCue,
            ]
        );

        // Matched cards can't be flipped again.
        assert!(!s.activate(A, &mut sched, &mut port));
    }

    #[test]
    fn test_mismatch_shakes_then_hides() {
        let (mut s, mut sched, mut port) = running(40);
        s.activate(A, &mut sched, &mut port);
        s.activate(B, &mut sched, &mut port);
        port.take();

        sched.advance(REVEAL_DELAY_MS);
        let task = sched.pop_due().unwrap();
        s.run_deferred(task.kind, &mut sched, &mut port);

        // Step 0 runs immediately, the rest are queued.
        assert_eq!(s.moves(), 1);
        assert!(s.is_locked());
        assert_eq!(s.face_at(A), Some(CardFace::FaceUp));
        assert_eq!(
            port.take(),
            vec![
                PresentationEvent::MoveCountChanged(1),
                PresentationEvent::MismatchCue,
                PresentationEvent::ShakeStep([A, B], 1),
            ]
        );

        s.settle(&mut sched, &mut port);
        let signs: Vec<i8> = port
            .events
            .iter()
            .filter_map(|e| match e {
                PresentationEvent::ShakeStep(_, sign) => Some(*sign),
                _ => None,
            })
            .collect();
        assert_eq!(signs, vec![-1, 1, -1, 1, -1, 0]);
        assert_eq!(s.face_at(A), Some(CardFace::FaceDown));
        assert_eq!(s.face_at(B), Some(CardFace::FaceDown));
        assert!(!s.is_locked());
        assert!(s.pending().is_empty());
        assert_eq!(s.moves(), 1);
    }

    #[test]
    fn test_shake_timing() {
        let (mut s, mut sched, mut port) = running(40);
        s.activate(A, &mut sched, &mut port);
        s.activate(B, &mut sched, &mut port);
        sched.advance(REVEAL_DELAY_MS);
        let task = sched.pop_due().unwrap();
        s.run_deferred(task.kind, &mut sched, &mut port);

        // Cards stay up until the sixth step, 6 * 70ms later.
        for _ in 0..SHAKE_STEPS {
            sched.advance(SHAKE_STEP_MS - 1);
            assert!(sched.pop_due().is_none());
            sched.advance(1);
            assert_eq!(s.face_at(A), Some(CardFace::FaceUp));
            let task = sched.pop_due().unwrap();
            s.run_deferred(task.kind, &mut sched, &mut port);
        }
        assert_eq!(s.face_at(A), Some(CardFace::FaceDown));
        assert!(sched.is_empty());
    }

    #[test]
    fn test_resolve_without_pair_is_noop() {
        let (mut s, mut sched, mut port) = running(40);
        assert!(!s.resolve(&mut sched, &mut port));
        s.activate(A, &mut sched, &mut port);
        assert!(!s.resolve(&mut sched, &mut port));
        assert_eq!(s.moves(), 0);
    }

    #[test]
    fn test_win_records_score_once() {
        let (mut s, mut sched, mut port) = running(40);
        s.tick(12, &mut port);
        assert_eq!(s.remaining_secs(), 28);

        for (a, b) in [(A, D), (B, C)] {
            s.activate(a, &mut sched, &mut port);
            s.activate(b, &mut sched, &mut port);
            s.settle(&mut sched, &mut port);
        }

        assert_eq!(s.phase(), Phase::Won);
        assert_eq!(s.moves(), 2);
        let expected = 1000 + 28 * 10 - 2 * 50;
        assert_eq!(s.final_score(), Some(expected));
        assert_eq!(
            port.count(|e| matches!(e, PresentationEvent::Win { .. })),
            1
        );
        assert!(port.events.contains(&PresentationEvent::Win {
            score: expected,
            moves: 2,
            time_taken_secs: 12,
        }));

        let record = s.take_result().unwrap();
        assert_eq!(record, ScoreRecord::new(expected, 12, 2, "Ann"));
        assert!(s.take_result().is_none());

        // Terminal: nothing else moves.
        assert!(!s.resolve(&mut sched, &mut port));
        assert!(!s.tick(30, &mut port));
        assert_eq!(s.remaining_secs(), 28);
    }

    #[test]
    fn test_win_flash_alternates_and_ends_unlit() {
        let (mut s, mut sched, mut port) = running(40);
        for (a, b) in [(A, D), (B, C)] {
            s.activate(a, &mut sched, &mut port);
            s.activate(b, &mut sched, &mut port);
            s.settle(&mut sched, &mut port);
        }
        let flashes: Vec<bool> = port
            .events
            .iter()
            .filter_map(|e| match e {
                PresentationEvent::WinFlash(lit) => Some(*lit),
                _ => None,
            })
            .collect();
        assert_eq!(flashes, vec![true, false, true, false, true, false]);
        assert_eq!(s.phase(), Phase::Won);
        assert!(sched.is_empty());
    }

    #[test]
    fn test_tick_counts_down_and_reports_tiers() {
        let (mut s, _sched, mut port) = running(25);
        assert!(s.tick(1, &mut port));
        assert!(!s.tick(1, &mut port));
        assert!(s.tick(5, &mut port));
        assert!(s.tick(16, &mut port));
        assert_eq!(
            port.events,
            vec![
                PresentationEvent::TimeChanged(24, UrgencyTier::Normal),
                PresentationEvent::TimeChanged(20, UrgencyTier::Warning),
                PresentationEvent::TimeChanged(9, UrgencyTier::Critical),
            ]
        );
    }

    #[test]
    fn test_tick_never_adds_time() {
        let (mut s, _sched, mut port) = running(25);
        s.tick(10, &mut port);
        assert!(!s.tick(3, &mut port));
        assert_eq!(s.remaining_secs(), 15);
    }

    #[test]
    fn test_timeout_has_no_record() {
        let (mut s, mut sched, mut port) = running(5);
        s.activate(A, &mut sched, &mut port);
        s.activate(D, &mut sched, &mut port);

        assert!(s.tick(9, &mut port));
        assert_eq!(s.phase(), Phase::TimedOut);
        assert_eq!(s.remaining_secs(), 0);
        assert_eq!(port.count(|e| *e == PresentationEvent::Timeout), 1);

        // The queued comparison no longer applies.
        s.settle(&mut sched, &mut port);
        assert_eq!(s.moves(), 0);
        assert_eq!(s.face_at(A), Some(CardFace::FaceUp));
        assert!(s.take_result().is_none());
        assert!(s.final_score().is_none());

        assert!(!s.tick(20, &mut port));
        assert!(!s.activate(B, &mut sched, &mut port));
        assert_eq!(port.count(|e| *e == PresentationEvent::Timeout), 1);
    }

    #[test]
    fn test_score_clamped_at_zero() {
        let (mut s, mut sched, mut port) = running(40);
        // 30 wasted moves.
        for _ in 0..30 {
            s.activate(A, &mut sched, &mut port);
            s.activate(B, &mut sched, &mut port);
            s.settle(&mut sched, &mut port);
        }
        for (a, b) in [(A, D), (B, C)] {
            s.activate(a, &mut sched, &mut port);
            s.activate(b, &mut sched, &mut port);
            s.settle(&mut sched, &mut port);
        }
        assert_eq!(s.moves(), 32);
        assert_eq!(s.final_score(), Some(0));
    }

    #[test]
    fn test_snapshot_hides_face_down_motifs() {
        let (mut s, mut sched, mut port) = running(40);
        s.activate(B, &mut sched, &mut port);
        let snap = s.snapshot();
        assert_eq!(snap.rows, 2);
        assert_eq!(snap.cols, 2);
        assert_eq!(snap.cells.len(), 4);
        assert_eq!(snap.cell(B).unwrap().motif, Some(MotifIndex(1)));
        assert_eq!(snap.cell(A).unwrap().motif, None);
        assert_eq!(snap.phase, Phase::Running);
        assert_eq!(snap.player_name, "Ann");
        assert_eq!(snap.total_pairs, 2);

        let mut reused = snap.clone();
        s.activate(C, &mut sched, &mut port);
        s.snapshot_into(&mut reused);
        assert!(reused.locked);
        assert_eq!(reused.cells.len(), 4);
    }

    #[test]
    fn test_blank_deck_still_playable() {
        let base = ThemeCatalog::standard().levels()[0];
        let level = LevelConfig {
            rows: 1,
            cols: 2,
            ..base
        };
        let deck = Deck::from_motifs(1, 2, Vec::new());
        let mut s = GameSession::new(level, deck, "Bo", 1);
        let mut sched = Scheduler::new();
        let mut port = RecordingPort::new();
        s.start(&mut port);
        s.activate(Cell::new(0, 0), &mut sched, &mut port);
        s.activate(Cell::new(0, 1), &mut sched, &mut port);
        s.settle(&mut sched, &mut port);
        assert_eq!(s.phase(), Phase::Won);
    }
}
