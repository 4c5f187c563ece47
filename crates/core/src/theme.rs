//! Theme catalog - static per-level configuration
//!
//! Each level fixes its grid, time limit, motif pool and palette. The table is
//! validated once (`ThemeCatalog::new`) so the rest of the game can rely on the
//! grid invariants without re-checking them.

use crate::types::{Cell, LEVEL_COUNT};

/// One card picture: a name for logs/help and a glyph for the terminal face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Motif {
    pub name: &'static str,
    pub glyph: char,
}

const fn motif(name: &'static str, glyph: char) -> Motif {
    Motif { name, glyph }
}

/// Level colours as RGB triples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: [u8; 3],
    pub card_back: [u8; 3],
    pub accent: [u8; 3],
    pub text: [u8; 3],
}

/// Immutable configuration for one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelConfig {
    pub id: u8,
    pub name: &'static str,
    pub rows: u8,
    pub cols: u8,
    pub time_limit_secs: u32,
    pub motifs: &'static [Motif],
    pub palette: Palette,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThemeError {
    #[error("level {level}: grid {rows}x{cols} has an odd number of cells")]
    OddGrid { level: u8, rows: u8, cols: u8 },

    #[error("level {level}: grid must have at least one row and column")]
    EmptyGrid { level: u8 },

    #[error("level {level}: time limit must be at least one second")]
    NoTime { level: u8 },

    #[error("level {level}: {motifs} motifs cannot fill {pairs} pairs")]
    TooFewMotifs { level: u8, motifs: usize, pairs: usize },

    #[error("level ids must run 1..=n in order, found {found} at position {position}")]
    BadLevelId { position: usize, found: u8 },
}

impl LevelConfig {
    pub fn cell_count(&self) -> usize {
        (self.rows as usize) * (self.cols as usize)
    }

    pub fn pairs(&self) -> usize {
        self.cell_count() / 2
    }

    pub fn motif_count(&self) -> usize {
        self.motifs.len()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// Iterate all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.cell_count()).map(move |i| Cell::from_index(i, self.cols))
    }

    pub fn validate(&self) -> Result<(), ThemeError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ThemeError::EmptyGrid { level: self.id });
        }
        if self.cell_count() % 2 != 0 {
            return Err(ThemeError::OddGrid {
                level: self.id,
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.time_limit_secs == 0 {
            return Err(ThemeError::NoTime { level: self.id });
        }
        if self.motif_count() < self.pairs() {
            return Err(ThemeError::TooFewMotifs {
                level: self.id,
                motifs: self.motif_count(),
                pairs: self.pairs(),
            });
        }
        Ok(())
    }
}

const FOREST_MOTIFS: [Motif; 6] = [
    motif("owl", 'O'),
    motif("mushroom", 'M'),
    motif("tree", 'T'),
    motif("butterfly", 'B'),
    motif("deer", 'D'),
    motif("lion", 'L'),
];

const SEA_MOTIFS: [Motif; 8] = [
    motif("fish", 'F'),
    motif("jellyfish", 'J'),
    motif("octopus", 'O'),
    motif("starfish", '*'),
    motif("crab", 'C'),
    motif("dolphin", 'D'),
    motif("clownfish", 'K'),
    motif("seahorse", 'S'),
];

const CLOCKWORK_MOTIFS: [Motif; 10] = [
    motif("bolt", 'B'),
    motif("gear", 'G'),
    motif("clock", 'C'),
    motif("tools", 'T'),
    motif("wrench", 'W'),
    motif("compass", '+'),
    motif("satellite", 'S'),
    motif("bulb", 'U'),
    motif("battery", '='),
    motif("hourglass", 'H'),
];

const STANDARD_LEVELS: [LevelConfig; LEVEL_COUNT as usize] = [
    LevelConfig {
        id: 1,
        name: "Enchanted Forest",
        rows: 4,
        cols: 3,
        time_limit_secs: 40,
        motifs: &FOREST_MOTIFS,
        palette: Palette {
            background: [0x1a, 0x23, 0x32],
            card_back: [0x34, 0x49, 0x5e],
            accent: [0x09, 0xec, 0x68],
            text: [0xec, 0xf0, 0xc1],
        },
    },
    LevelConfig {
        id: 2,
        name: "Under the Sea",
        rows: 4,
        cols: 4,
        time_limit_secs: 60,
        motifs: &SEA_MOTIFS,
        palette: Palette {
            background: [0xa9, 0xcf, 0xd1],
            card_back: [0x11, 0x64, 0x66],
            accent: [0x19, 0x19, 0x70],
            text: [0x2b, 0x2d, 0x42],
        },
    },
    LevelConfig {
        id: 3,
        name: "Steampunk Clockwork",
        rows: 4,
        cols: 5,
        time_limit_secs: 80,
        motifs: &CLOCKWORK_MOTIFS,
        palette: Palette {
            background: [0x2c, 0x18, 0x10],
            card_back: [0x4a, 0x37, 0x28],
            accent: [0xe4, 0x9b, 0x49],
            text: [0xf4, 0xe4, 0xbc],
        },
    },
];

/// Ordered, validated set of levels.
#[derive(Debug, Clone)]
pub struct ThemeCatalog {
    levels: Vec<LevelConfig>,
}

impl ThemeCatalog {
    /// Build a catalog, rejecting any level that breaks the grid invariants.
    pub fn new(levels: Vec<LevelConfig>) -> Result<Self, ThemeError> {
        for (position, level) in levels.iter().enumerate() {
            if level.id as usize != position + 1 {
                return Err(ThemeError::BadLevelId {
                    position,
                    found: level.id,
                });
            }
            level.validate()?;
        }
        Ok(Self { levels })
    }

    /// The three built-in levels.
    pub fn standard() -> Self {
        Self {
            levels: STANDARD_LEVELS.to_vec(),
        }
    }

    pub fn get(&self, id: u8) -> Option<&LevelConfig> {
        if id == 0 {
            return None;
        }
        self.levels.get(id as usize - 1)
    }

    pub fn levels(&self) -> &[LevelConfig] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Id of the level after `id`, if there is one.
    pub fn next_after(&self, id: u8) -> Option<u8> {
        let next = id.checked_add(1)?;
        self.get(next).map(|level| level.id)
    }
}

impl Default for ThemeCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
