use crate::types::{CardFace, Cell, MotifIndex, Phase, UrgencyTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellSnapshot {
    pub face: CardFace,
    /// Only set while the face is visible.
    pub motif: Option<MotifIndex>,
}

/// Read-only copy of a session for views.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    pub level_id: u8,
    pub rows: u8,
    pub cols: u8,
    /// Row-major.
    pub cells: Vec<CellSnapshot>,
    pub moves: u32,
    pub remaining_secs: u32,
    pub time_limit_secs: u32,
    pub tier: UrgencyTier,
    pub phase: Phase,
    pub locked: bool,
    pub matched_pairs: u32,
    pub total_pairs: u32,
    pub final_score: Option<u32>,
    pub player_name: String,
}

impl SessionSnapshot {
    pub fn cell(&self, cell: Cell) -> Option<&CellSnapshot> {
        if cell.row >= self.rows || cell.col >= self.cols {
            return None;
        }
        self.cells.get(cell.index(self.cols))
    }

    pub fn clear(&mut self) {
        self.level_id = 0;
        self.rows = 0;
        self.cols = 0;
        self.cells.clear();
        self.moves = 0;
        self.remaining_secs = 0;
        self.time_limit_secs = 0;
        self.tier = UrgencyTier::Normal;
        self.phase = Phase::Idle;
        self.locked = false;
        self.matched_pairs = 0;
        self.total_pairs = 0;
        self.final_score = None;
        self.player_name.clear();
    }

    /// Whether the board currently accepts card activations.
    pub fn playable(&self) -> bool {
        self.phase == Phase::Running && !self.locked
    }
}
