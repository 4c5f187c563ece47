//! Deck module - per-round card-to-motif assignment
//!
//! A deck pairs every cell of the grid with a motif so that each motif shows
//! up on exactly two cells. When the motif pool is smaller than the number of
//! pairs the pool is cycled (some motifs then form several pairs); an empty
//! pool gives every cell the blank motif. The assignment is a uniform random
//! permutation and never changes after the deck is built.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::theme::LevelConfig;
use crate::types::{Cell, MotifIndex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    rows: u8,
    cols: u8,
    /// Row-major cell → motif mapping.
    motifs: Vec<MotifIndex>,
}

impl Deck {
    /// Build and shuffle a deck for `level`, drawing from the first
    /// `pool_len` motifs.
    pub fn build<R: Rng + ?Sized>(level: &LevelConfig, pool_len: usize, rng: &mut R) -> Self {
        let mut motifs = pair_multiset(level.pairs(), pool_len);
        if pool_len < level.pairs() {
            tracing::warn!(
                level = level.id,
                pool_len,
                pairs = level.pairs(),
                "motif pool smaller than pair count, repeating motifs"
            );
        }
        motifs.shuffle(rng);
        Self::from_motifs(level.rows, level.cols, motifs)
    }

    /// Lay out an explicit row-major assignment (used by tests and benches).
    ///
    /// Missing trailing cells are filled with the blank motif and extra entries
    /// are dropped, so the deck always covers exactly `rows * cols` cells.
    pub fn from_motifs(rows: u8, cols: u8, mut motifs: Vec<MotifIndex>) -> Self {
        let len = (rows as usize) * (cols as usize);
        motifs.resize(len, MotifIndex::BLANK);
        Self { rows, cols, motifs }
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.motifs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motifs.is_empty()
    }

    pub fn motif_at(&self, cell: Cell) -> Option<MotifIndex> {
        if cell.row >= self.rows || cell.col >= self.cols {
            return None;
        }
        self.motifs.get(cell.index(self.cols)).copied()
    }

    /// Row-major motif slice.
    pub fn motifs(&self) -> &[MotifIndex] {
        &self.motifs
    }

    /// Iterate `(cell, motif)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, MotifIndex)> + '_ {
        self.motifs
            .iter()
            .enumerate()
            .map(move |(i, &m)| (Cell::from_index(i, self.cols), m))
    }
}

/// Unshuffled multiset holding `pairs` pairs of motif indices.
fn pair_multiset(pairs: usize, pool_len: usize) -> Vec<MotifIndex> {
    if pool_len == 0 {
        return vec![MotifIndex::BLANK; pairs * 2];
    }
    let pool_len = pool_len.min(u16::MAX as usize);
    let singles = (0..pool_len).cycle().take(pairs);
    let mut out: Vec<MotifIndex> = singles.map(|i| MotifIndex(i as u16)).collect();
    out.extend_from_within(..);
    out
}
