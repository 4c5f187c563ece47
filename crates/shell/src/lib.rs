//! Application shell: screens, configuration and the leaderboard file.
//!
//! Sits between the pure game rules in `neuro-quest-core` and a front-end.
//! The front-end feeds it [`InputAction`](crate::types::InputAction)s and
//! elapsed time, implements [`PresentationPort`](crate::core::PresentationPort),
//! and draws whatever [`Screen`] the shell reports.

pub mod app;
pub mod config;
pub mod screen;
pub mod store;

pub use neuro_quest_core as core;
pub use neuro_quest_types as types;

pub use app::{AppShell, ShellError};
pub use config::AppConfig;
pub use screen::{LeaderboardView, MenuItem, Screen, TimeoutChoice};
pub use store::{LeaderboardStore, StoreError};
