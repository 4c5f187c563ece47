//! Application shell - screen navigation around the game session
//!
//! The shell owns everything that outlives a single level: the catalog, the
//! leaderboard and its file, the scheduler and the shuffle RNG. It holds at
//! most one [`GameSession`], identified by a generation number; tasks queued
//! by an older generation are dropped when they come due.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::AppConfig;
use crate::core::{
    Deck, GameSession, Leaderboard, PresentationPort, ScoreRecord, Scheduler, SessionSnapshot,
    ThemeCatalog, ThemeError,
};
use crate::screen::{step_selection, LeaderboardView, MenuItem, Screen, TimeoutChoice};
use crate::store::{LeaderboardStore, StoreError};
use crate::types::{Cell, InputAction, Phase, RESULT_SCREEN_DELAY_MS};

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error(transparent)]
    Theme(#[from] ThemeError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Leaderboard screen waiting for its delay after a win.
#[derive(Debug, Clone, Copy)]
struct PendingResult {
    due_ms: u64,
    view: LeaderboardView,
}

pub struct AppShell<P: PresentationPort> {
    catalog: ThemeCatalog,
    leaderboard: Leaderboard,
    store: LeaderboardStore,
    scheduler: Scheduler,
    session: Option<GameSession>,
    generation: u32,
    /// Scheduler clock when the live session started.
    started_at_ms: u64,
    rng: StdRng,
    motif_limit: Option<usize>,
    port: P,
    screen: Screen,
    player_name: String,
    cursor: Cell,
    pending_result: Option<PendingResult>,
    notice: Option<String>,
    quit: bool,
}

impl<P: PresentationPort> AppShell<P> {
    /// Validate the catalog and load the leaderboard named by `config`.
    pub fn new(config: &AppConfig, port: P) -> Result<Self, ShellError> {
        let catalog = ThemeCatalog::new(ThemeCatalog::standard().levels().to_vec())?;
        let store = if config.save_enabled {
            LeaderboardStore::new(&config.leaderboard_path)
        } else {
            LeaderboardStore::read_only(&config.leaderboard_path)
        };
        let leaderboard = store.load()?;
        Ok(Self::from_parts(config, catalog, leaderboard, store, port))
    }

    pub fn from_parts(
        config: &AppConfig,
        catalog: ThemeCatalog,
        leaderboard: Leaderboard,
        store: LeaderboardStore,
        port: P,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            catalog,
            leaderboard,
            store,
            scheduler: Scheduler::new(),
            session: None,
            generation: 0,
            started_at_ms: 0,
            rng,
            motif_limit: config.motif_limit,
            port,
            screen: Screen::default(),
            player_name: config.player_name.clone(),
            cursor: Cell::new(0, 0),
            pending_result: None,
            notice: None,
            quit: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn catalog(&self) -> &ThemeCatalog {
        &self.catalog
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn cursor(&self) -> Cell {
        self.cursor
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// One-line status message (empty name, failed save).
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Quit from any screen, dropping the live session.
    pub fn request_quit(&mut self) {
        self.end_session();
        self.quit = true;
    }

    /// Best record for the level-select summary.
    pub fn best_of(&self, level: u8) -> Option<&ScoreRecord> {
        self.leaderboard.best_of(level)
    }

    /// Fill `out` from the live session. Returns false when there is none.
    pub fn session_snapshot_into(&self, out: &mut SessionSnapshot) -> bool {
        match &self.session {
            Some(session) => {
                session.snapshot_into(out);
                true
            }
            None => {
                out.clear();
                false
            }
        }
    }

    pub fn open_name_entry(&mut self) {
        self.notice = None;
        self.screen = Screen::NameEntry;
    }

    /// Accept the typed name and move on to level select.
    pub fn submit_name(&mut self, name: &str) -> bool {
        let name: String = name.trim().chars().filter(|c| *c != ',').collect();
        if name.is_empty() {
            self.notice = Some("Please enter a name.".to_string());
            return false;
        }
        tracing::debug!(player = %name, "player name set");
        self.player_name = name;
        self.notice = None;
        self.screen = Screen::LevelSelect { selected: 0 };
        true
    }

    pub fn cancel_name_entry(&mut self) {
        self.go_main_menu();
    }

    /// Build a fresh session for `level_id` and start it.
    pub fn start(&mut self, level_id: u8) -> bool {
        let Some(level) = self.catalog.get(level_id).copied() else {
            tracing::warn!(level = level_id, "no such level");
            return false;
        };
        self.end_session();

        self.generation = self.generation.wrapping_add(1);
        let pool_len = self
            .motif_limit
            .map_or(level.motif_count(), |limit| limit.min(level.motif_count()));
        let deck = Deck::build(&level, pool_len, &mut self.rng);

        let mut session = GameSession::new(level, deck, self.player_name.clone(), self.generation);
        session.start(&mut self.port);
        tracing::info!(
            level = level.id,
            generation = self.generation,
            player = %self.player_name,
            "level started"
        );

        self.session = Some(session);
        self.started_at_ms = self.scheduler.now_ms();
        self.cursor = Cell::new(0, 0);
        self.notice = None;
        self.screen = Screen::Playing;
        true
    }

    pub fn activate(&mut self, cell: Cell) -> bool {
        if self.screen != Screen::Playing {
            return false;
        }
        match self.session.as_mut() {
            Some(session) => session.activate(cell, &mut self.scheduler, &mut self.port),
            None => false,
        }
    }

    /// Replay the current level with a newly shuffled deck.
    pub fn restart(&mut self) -> bool {
        match self.session.as_ref().map(|s| s.level().id) {
            Some(level_id) => self.start(level_id),
            None => false,
        }
    }

    /// Abandon the session and return to the main menu.
    pub fn exit(&mut self) {
        self.go_main_menu();
    }

    /// Move time forward: run due tasks, update the clock, react to results.
    pub fn advance(&mut self, elapsed_ms: u32) {
        let target_ms = self.scheduler.now_ms().saturating_add(elapsed_ms as u64);

        // Tasks run at their own due time, with the clock caught up first, so a
        // resolve that falls due after the deadline finds the session timed out.
        while let Some(task) = self.scheduler.pop_due_by(target_ms) {
            self.tick_session();
            match self.session.as_mut() {
                Some(session) if session.generation() == task.generation => {
                    session.run_deferred(task.kind, &mut self.scheduler, &mut self.port);
                }
                _ => tracing::trace!(generation = task.generation, "dropping stale task"),
            }
        }

        self.scheduler.advance_to(target_ms);
        self.tick_session();

        self.collect_result();

        if self.screen == Screen::Playing {
            if self.session.as_ref().map(GameSession::phase) == Some(Phase::TimedOut) {
                self.screen = Screen::TimedOut { selected: 0 };
            } else if let Some(pending) = self.pending_result {
                if self.scheduler.now_ms() >= pending.due_ms {
                    self.pending_result = None;
                    self.screen = Screen::Leaderboard(pending.view);
                }
            }
        }
    }

    /// Bring the live session's clock up to the scheduler clock.
    fn tick_session(&mut self) {
        if let Some(session) = self.session.as_mut() {
            let elapsed_ms = self.scheduler.now_ms().saturating_sub(self.started_at_ms);
            let elapsed_secs = u32::try_from(elapsed_ms / 1000).unwrap_or(u32::MAX);
            session.tick(elapsed_secs, &mut self.port);
        }
    }

    /// Apply one navigation/gameplay action to the current screen.
    pub fn handle(&mut self, action: InputAction) {
        match self.screen {
            Screen::MainMenu { selected } => match action {
                InputAction::MoveUp | InputAction::MoveLeft => {
                    self.screen = Screen::MainMenu {
                        selected: step_selection(selected, MenuItem::ALL.len(), -1),
                    };
                }
                InputAction::MoveDown | InputAction::MoveRight => {
                    self.screen = Screen::MainMenu {
                        selected: step_selection(selected, MenuItem::ALL.len(), 1),
                    };
                }
                InputAction::Confirm => {
                    if let Some(item) = MenuItem::ALL.get(selected).copied() {
                        self.choose(item);
                    }
                }
                InputAction::Back | InputAction::Restart => {}
            },
            Screen::NameEntry => {
                if action == InputAction::Back {
                    self.cancel_name_entry();
                }
            }
            Screen::LevelSelect { selected } => match action {
                InputAction::MoveUp | InputAction::MoveLeft => {
                    self.screen = Screen::LevelSelect {
                        selected: step_selection(selected, self.catalog.len(), -1),
                    };
                }
                InputAction::MoveDown | InputAction::MoveRight => {
                    self.screen = Screen::LevelSelect {
                        selected: step_selection(selected, self.catalog.len(), 1),
                    };
                }
                InputAction::Confirm => {
                    if let Some(level_id) = self.catalog.levels().get(selected).map(|l| l.id) {
                        self.start(level_id);
                    }
                }
                InputAction::Back => self.go_main_menu(),
                InputAction::Restart => {}
            },
            Screen::Instructions => self.go_main_menu(),
            Screen::Playing => match action {
                InputAction::MoveUp => self.move_cursor(-1, 0),
                InputAction::MoveDown => self.move_cursor(1, 0),
                InputAction::MoveLeft => self.move_cursor(0, -1),
                InputAction::MoveRight => self.move_cursor(0, 1),
                InputAction::Confirm => {
                    self.activate(self.cursor);
                }
                InputAction::Restart => {
                    self.restart();
                }
                InputAction::Back => self.exit(),
            },
            Screen::TimedOut { selected } => match action {
                InputAction::MoveUp
                | InputAction::MoveDown
                | InputAction::MoveLeft
                | InputAction::MoveRight => {
                    self.screen = Screen::TimedOut {
                        selected: step_selection(selected, TimeoutChoice::ALL.len(), 1),
                    };
                }
                InputAction::Confirm => match TimeoutChoice::ALL.get(selected) {
                    Some(TimeoutChoice::Retry) => {
                        self.restart();
                    }
                    _ => self.exit(),
                },
                InputAction::Restart => {
                    self.restart();
                }
                InputAction::Back => self.exit(),
            },
            Screen::Leaderboard(view) => match action {
                InputAction::MoveLeft | InputAction::MoveUp => {
                    self.screen = Screen::Leaderboard(LeaderboardView {
                        level: self.tab_step(view.level, -1),
                        ..view
                    });
                }
                InputAction::MoveRight | InputAction::MoveDown => {
                    self.screen = Screen::Leaderboard(LeaderboardView {
                        level: self.tab_step(view.level, 1),
                        ..view
                    });
                }
                InputAction::Confirm => {
                    if let Some(next) = view.next_level {
                        self.start(next);
                    }
                }
                InputAction::Back => self.go_main_menu(),
                InputAction::Restart => {}
            },
        }
    }

    fn choose(&mut self, item: MenuItem) {
        match item {
            MenuItem::Start => self.open_name_entry(),
            MenuItem::Instructions => self.screen = Screen::Instructions,
            MenuItem::Leaderboard => {
                self.screen = Screen::Leaderboard(LeaderboardView::browse(1));
            }
            MenuItem::Quit => self.quit = true,
        }
    }

    fn go_main_menu(&mut self) {
        self.end_session();
        self.screen = Screen::default();
    }

    fn end_session(&mut self) {
        self.pending_result = None;
        if let Some(session) = self.session.take() {
            let dropped = self.scheduler.cancel_generation(session.generation());
            tracing::debug!(
                generation = session.generation(),
                dropped,
                phase = session.phase().as_str(),
                "session ended"
            );
        }
    }

    fn move_cursor(&mut self, d_row: i16, d_col: i16) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let rows = session.deck().rows() as i16;
        let cols = session.deck().cols() as i16;
        let row = (self.cursor.row as i16 + d_row).clamp(0, (rows - 1).max(0));
        let col = (self.cursor.col as i16 + d_col).clamp(0, (cols - 1).max(0));
        self.cursor = Cell::new(row as u8, col as u8);
    }

    fn tab_step(&self, level: u8, delta: isize) -> u8 {
        let count = self.catalog.len();
        let index = step_selection(level.saturating_sub(1) as usize, count, delta);
        (index + 1) as u8
    }

    /// Record a finished win and queue the result screen.
    fn collect_result(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(record) = session.take_result() else {
            return;
        };
        let level_id = session.level().id;

        let rank = self.leaderboard.submit(level_id, record);
        if let Err(err) = self.store.save(&self.leaderboard) {
            tracing::error!(%err, "failed to save leaderboard");
            self.notice = Some(format!("Leaderboard not saved: {err}"));
        }

        self.pending_result = Some(PendingResult {
            due_ms: self
                .scheduler
                .now_ms()
                .saturating_add(RESULT_SCREEN_DELAY_MS as u64),
            view: LeaderboardView {
                level: level_id,
                won_level: Some(level_id),
                rank,
                next_level: self.catalog.next_after(level_id),
            },
        });
    }
}
