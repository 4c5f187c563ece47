//! Screens and their local selection state.

/// Main menu entries, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Start,
    Instructions,
    Leaderboard,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 4] = [
        MenuItem::Start,
        MenuItem::Instructions,
        MenuItem::Leaderboard,
        MenuItem::Quit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::Start => "Start Game",
            MenuItem::Instructions => "Instructions",
            MenuItem::Leaderboard => "Leaderboard",
            MenuItem::Quit => "Quit",
        }
    }
}

/// Choices in the time-up popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutChoice {
    Retry,
    MainMenu,
}

impl TimeoutChoice {
    pub const ALL: [TimeoutChoice; 2] = [TimeoutChoice::Retry, TimeoutChoice::MainMenu];

    pub fn label(&self) -> &'static str {
        match self {
            TimeoutChoice::Retry => "Retry",
            TimeoutChoice::MainMenu => "Main Menu",
        }
    }
}

/// Leaderboard screen state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LeaderboardView {
    /// Level whose tab is shown.
    pub level: u8,
    /// Level that was just won, when shown as a result screen.
    pub won_level: Option<u8>,
    /// Rank the new record landed on, if it made the cut.
    pub rank: Option<usize>,
    /// Level offered as "next", if any.
    pub next_level: Option<u8>,
}

impl LeaderboardView {
    pub fn browse(level: u8) -> Self {
        Self {
            level,
            won_level: None,
            rank: None,
            next_level: None,
        }
    }

    pub fn is_result(&self) -> bool {
        self.won_level.is_some()
    }

    /// Highlighted rank on the visible tab.
    pub fn highlighted_rank(&self) -> Option<usize> {
        if self.won_level == Some(self.level) {
            self.rank
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    MainMenu { selected: usize },
    NameEntry,
    LevelSelect { selected: usize },
    Instructions,
    Playing,
    TimedOut { selected: usize },
    Leaderboard(LeaderboardView),
}

impl Default for Screen {
    fn default() -> Self {
        Screen::MainMenu { selected: 0 }
    }
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::MainMenu { .. } => "mainMenu",
            Screen::NameEntry => "nameEntry",
            Screen::LevelSelect { .. } => "levelSelect",
            Screen::Instructions => "instructions",
            Screen::Playing => "playing",
            Screen::TimedOut { .. } => "timedOut",
            Screen::Leaderboard(_) => "leaderboard",
        }
    }
}

/// Step a list selection by `delta`, wrapping around.
pub(crate) fn step_selection(selected: usize, len: usize, delta: isize) -> usize {
    if len == 0 {
        return 0;
    }
    (selected as isize + delta).rem_euclid(len as isize) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_wraps() {
        assert_eq!(step_selection(0, 4, -1), 3);
        assert_eq!(step_selection(3, 4, 1), 0);
        assert_eq!(step_selection(1, 4, 1), 2);
        assert_eq!(step_selection(0, 0, 1), 0);
    }

    #[test]
    fn test_highlight_only_on_its_tab() {
        let mut view = LeaderboardView {
            level: 2,
            won_level: Some(2),
            rank: Some(1),
            next_level: Some(3),
        };
        assert_eq!(view.highlighted_rank(), Some(1));
        view.level = 1;
        assert_eq!(view.highlighted_rank(), None);
        assert!(view.is_result());
        assert!(!LeaderboardView::browse(1).is_result());
    }
}
