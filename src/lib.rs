//! Neuro Quest (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so the binary, the
//! integration tests and the benches share a single import path.

pub use neuro_quest_core as core;
pub use neuro_quest_input as input;
pub use neuro_quest_shell as shell;
pub use neuro_quest_term as term;
pub use neuro_quest_types as types;
