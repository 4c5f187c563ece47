//! Terminal front-end for Neuro Quest.
//!
//! Renders into a plain framebuffer instead of a widget toolkit, then flushes
//! only the changed runs to the terminal.
//!
//! - [`presenter`]: the terminal's `PresentationPort` (shake, cues, flash)
//! - [`game_view`]: card grid and side panel
//! - [`screens`]: menus, name entry, level select, popup, leaderboard
//! - [`renderer`]: crossterm output with diffing
//! - [`throttle`]: skip frames when nothing changed

pub mod fb;
pub mod game_view;
pub mod presenter;
pub mod renderer;
pub mod screens;
pub mod throttle;

pub use neuro_quest_core as core;
pub use neuro_quest_shell as shell;
pub use neuro_quest_types as types;

pub use fb::{CellStyle, FrameBuffer, Glyph, Rgb};
pub use game_view::{BoardLayout, BoardView, Viewport};
pub use presenter::{Cue, TerminalPresenter, WinSummary, CUE_VISIBLE_MS};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use screens::{ScreenRenderer, TerminalApp};
pub use throttle::{frame_key, RenderThrottle};
