//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds every rule of the memory game. It never draws, plays
//! sounds or touches the filesystem: visible changes go out through
//! [`PresentationPort`], delays go through [`Scheduler`], and the leaderboard
//! encodes to and decodes from any reader/writer.
//!
//! # Module Structure
//!
//! - [`theme`]: the three levels (grid, time limit, motif pool, palette)
//! - [`deck`]: shuffled cell → motif assignment, one pair per motif
//! - [`session`]: the per-level state machine
//! - [`scheduler`]: deferred tasks tagged with a session generation
//! - [`port`]: presentation callbacks plus recording/null ports
//! - [`scoring`]: end-of-level score
//! - [`leaderboard`]: per-level top five and its line format
//! - [`snapshot`]: read-only session copy for views
//!
//! # Example
//!
//! ```
//! use neuro_quest_core::{Deck, GameSession, RecordingPort, Scheduler, ThemeCatalog};
//! use neuro_quest_core::types::{Cell, Phase};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let catalog = ThemeCatalog::standard();
//! let level = *catalog.get(1).unwrap();
//! let deck = Deck::build(&level, level.motif_count(), &mut StdRng::seed_from_u64(1));
//!
//! let mut sched = Scheduler::new();
//! let mut port = RecordingPort::new();
//! let mut session = GameSession::new(level, deck, "Player", 1);
//! session.start(&mut port);
//!
//! session.activate(Cell::new(0, 0), &mut sched, &mut port);
//! session.activate(Cell::new(0, 1), &mut sched, &mut port);
//! assert!(session.is_locked());
//!
//! // Run the queued comparison (and shake, if any) right away.
//! session.settle(&mut sched, &mut port);
//! assert_eq!(session.moves(), 1);
//! assert_eq!(session.phase(), Phase::Running);
//! ```

pub mod deck;
pub mod leaderboard;
pub mod port;
pub mod scheduler;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod theme;

pub use neuro_quest_types as types;

// Re-export commonly used types for convenience
pub use deck::Deck;
pub use leaderboard::{parse_line, Leaderboard, LeaderboardError, LineError, ScoreRecord};
pub use port::{NullPort, PresentationEvent, PresentationPort, RecordingPort};
pub use scheduler::{Deferred, Scheduler, Task};
pub use scoring::{calculate_score, time_taken, ScoreResult};
pub use session::GameSession;
pub use snapshot::{CellSnapshot, SessionSnapshot};
pub use theme::{LevelConfig, Motif, Palette, ThemeCatalog, ThemeError};
