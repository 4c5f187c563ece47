//! Draws whichever screen the shell is on.
//!
//! Menus use a fixed palette; the board, the time-up popup and the
//! leaderboard tabs take their colours from the level they show.

use crate::core::{LevelConfig, ScoreRecord, SessionSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::game_view::{BoardView, Viewport};
use crate::presenter::TerminalPresenter;
use crate::shell::{AppShell, LeaderboardView, MenuItem, Screen, TimeoutChoice};
use crate::types::{BASE_SCORE, LEADERBOARD_CAPACITY, MOVE_PENALTY, TIME_BONUS_PER_SEC};

const MENU_BG: Rgb = Rgb::new(0x14, 0x18, 0x22);
const MENU_FG: Rgb = Rgb::new(0xdc, 0xdc, 0xdc);
const MENU_ACCENT: Rgb = Rgb::new(0x4f, 0xc3, 0xf7);
const NOTICE_FG: Rgb = Rgb::new(0xff, 0x8a, 0x65);

const INSTRUCTIONS: [&str; 7] = [
    "Turn over two cards at a time and find every matching pair.",
    "Matched pairs stay face up; a mismatch flips both back.",
    "Clear the board before the clock runs out.",
    "",
    "Arrows / hjkl / wasd  move      Enter / Space  flip",
    "r  restart level      Esc  back      q  quit",
    "",
];

pub type TerminalApp = AppShell<TerminalPresenter>;

/// Screen router holding the reusable board view.
#[derive(Default)]
pub struct ScreenRenderer {
    board: BoardView,
}

impl ScreenRenderer {
    pub fn new(board: BoardView) -> Self {
        Self { board }
    }

    /// Render the current screen of `app` into `fb`.
    ///
    /// `name_field` is the text being typed on the name screen; `snap` must be
    /// the live session's snapshot for the board screens.
    pub fn render_into(
        &self,
        app: &TerminalApp,
        name_field: &str,
        snap: &SessionSnapshot,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        match app.screen() {
            Screen::MainMenu { selected } => {
                clear_menu(fb, viewport);
                draw_main_menu(fb, selected, viewport);
            }
            Screen::NameEntry => {
                clear_menu(fb, viewport);
                draw_name_entry(fb, name_field, viewport);
            }
            Screen::LevelSelect { selected } => {
                clear_menu(fb, viewport);
                draw_level_select(fb, app, selected, viewport);
            }
            Screen::Instructions => {
                clear_menu(fb, viewport);
                draw_instructions(fb, viewport);
            }
            Screen::Playing => self.draw_board(fb, app, snap, viewport, true),
            Screen::TimedOut { selected } => {
                self.draw_board(fb, app, snap, viewport, false);
                draw_timeout_popup(fb, selected, viewport);
            }
            Screen::Leaderboard(view) => {
                clear_menu(fb, viewport);
                draw_leaderboard(fb, app, view, viewport);
            }
        }

        if let Some(notice) = app.notice() {
            let y = viewport.height.saturating_sub(1);
            let style = CellStyle::new(NOTICE_FG, MENU_BG).bold();
            fb.put_str_centered(0, y, viewport.width, notice, style);
        }
    }

    fn draw_board(
        &self,
        fb: &mut FrameBuffer,
        app: &TerminalApp,
        snap: &SessionSnapshot,
        viewport: Viewport,
        with_cursor: bool,
    ) {
        let Some(level) = app.catalog().get(snap.level_id) else {
            clear_menu(fb, viewport);
            return;
        };
        let cursor = with_cursor.then(|| app.cursor());
        self.board
            .render_into(snap, level, app.port(), cursor, viewport, fb);
    }
}

fn clear_menu(fb: &mut FrameBuffer, viewport: Viewport) {
    fb.resize(viewport.width, viewport.height);
    fb.clear(CellStyle::new(MENU_FG, MENU_BG).glyph(' '));
}

fn menu_style() -> CellStyle {
    CellStyle::new(MENU_FG, MENU_BG)
}

fn title(fb: &mut FrameBuffer, y: u16, text: &str, viewport: Viewport) {
    let style = CellStyle::new(MENU_ACCENT, MENU_BG).bold();
    fb.put_str_centered(0, y, viewport.width, text, style);
}

fn selectable(fb: &mut FrameBuffer, y: u16, label: &str, selected: bool, viewport: Viewport) {
    let (text, style) = if selected {
        (format!("> {label} <"), CellStyle::new(MENU_BG, MENU_ACCENT).bold())
    } else {
        (format!("  {label}  "), menu_style())
    };
    fb.put_str_centered(0, y, viewport.width, &text, style);
}

fn draw_main_menu(fb: &mut FrameBuffer, selected: usize, viewport: Viewport) {
    let top = viewport.height.saturating_sub(10) / 2;
    title(fb, top, "N E U R O   Q U E S T", viewport);
    fb.put_str_centered(
        0,
        top + 1,
        viewport.width,
        "a memory matching game",
        menu_style().dim(),
    );
    for (i, item) in MenuItem::ALL.iter().enumerate() {
        selectable(fb, top + 3 + i as u16 * 2, item.label(), i == selected, viewport);
    }
}

fn draw_name_entry(fb: &mut FrameBuffer, name_field: &str, viewport: Viewport) {
    let top = viewport.height.saturating_sub(7) / 2;
    title(fb, top, "Enter your name", viewport);

    let box_w = 24u16;
    let x = viewport.width.saturating_sub(box_w) / 2;
    fb.draw_box(x, top + 2, box_w, 3, CellStyle::new(MENU_ACCENT, MENU_BG));
    let end = fb.put_str(x + 2, top + 3, name_field, menu_style().bold());
    fb.put_char(end, top + 3, '_', CellStyle::new(MENU_ACCENT, MENU_BG));

    fb.put_str_centered(
        0,
        top + 6,
        viewport.width,
        "Enter  continue    Esc  back",
        menu_style().dim(),
    );
}

fn draw_level_select(fb: &mut FrameBuffer, app: &TerminalApp, selected: usize, viewport: Viewport) {
    let levels = app.catalog().levels();
    let top = viewport.height.saturating_sub(levels.len() as u16 * 3 + 3) / 2;
    title(fb, top, "Select a level", viewport);

    for (i, level) in levels.iter().enumerate() {
        let y = top + 2 + i as u16 * 3;
        let label = format!(
            "Level {}: {}  ({}x{}, {}s)",
            level.id, level.name, level.rows, level.cols, level.time_limit_secs
        );
        selectable(fb, y, &label, i == selected, viewport);
        let best = best_line(app.best_of(level.id));
        fb.put_str_centered(0, y + 1, viewport.width, &best, menu_style().dim());
    }
}

fn best_line(best: Option<&ScoreRecord>) -> String {
    match best {
        Some(r) => format!(
            "Best: {} by {}  Time: {}s",
            r.score, r.player_name, r.time_taken_secs
        ),
        None => "Best: N/A  Time: N/A".to_string(),
    }
}

fn draw_instructions(fb: &mut FrameBuffer, viewport: Viewport) {
    let top = viewport.height.saturating_sub(INSTRUCTIONS.len() as u16 + 5) / 2;
    title(fb, top, "How to play", viewport);
    for (i, line) in INSTRUCTIONS.iter().enumerate() {
        fb.put_str_centered(0, top + 2 + i as u16, viewport.width, line, menu_style());
    }
    let scoring = format!(
        "Score: {BASE_SCORE} + {TIME_BONUS_PER_SEC} per second left - {MOVE_PENALTY} per move"
    );
    let y = top + 2 + INSTRUCTIONS.len() as u16;
    fb.put_str_centered(0, y, viewport.width, &scoring, menu_style().bold());
    fb.put_str_centered(
        0,
        y + 2,
        viewport.width,
        "press any key",
        menu_style().dim(),
    );
}

fn draw_timeout_popup(fb: &mut FrameBuffer, selected: usize, viewport: Viewport) {
    let (w, h) = (30u16, 7u16);
    let x = viewport.width.saturating_sub(w) / 2;
    let y = viewport.height.saturating_sub(h) / 2;
    fb.fill_rect(x, y, w, h, ' ', menu_style());
    fb.draw_box(x, y, w, h, CellStyle::new(NOTICE_FG, MENU_BG));
    fb.put_str_centered(x, y + 1, w, "Time's up!", CellStyle::new(NOTICE_FG, MENU_BG).bold());

    let mut cx = x + 3;
    for (i, choice) in TimeoutChoice::ALL.iter().enumerate() {
        let style = if i == selected {
            CellStyle::new(MENU_BG, MENU_ACCENT).bold()
        } else {
            menu_style()
        };
        let label = format!(" {} ", choice.label());
        cx = fb.put_str(cx, y + 4, &label, style) + 3;
    }
}

fn draw_leaderboard(
    fb: &mut FrameBuffer,
    app: &TerminalApp,
    view: LeaderboardView,
    viewport: Viewport,
) {
    let level = app.catalog().get(view.level);
    let accent = level.map_or(MENU_ACCENT, |l| Rgb::from(l.palette.accent));
    let mut y = viewport.height.saturating_sub(LEADERBOARD_CAPACITY as u16 + 12) / 2;

    if let Some(won) = view.won_level {
        let name = app.catalog().get(won).map_or("", |l| l.name);
        let text = format!("Congratulations! {name} cleared");
        fb.put_str_centered(0, y, viewport.width, &text, CellStyle::new(accent, MENU_BG).bold());
        y += 2;
    }

    title(fb, y, "Leaderboard", viewport);
    y += 2;
    draw_tabs(fb, app, view.level, y, viewport);
    y += 2;

    let table_w = 46u16;
    let x = viewport.width.saturating_sub(table_w) / 2;
    fb.put_str(x, y, "#   Score   Time   Moves   Player", CellStyle::new(accent, MENU_BG));
    y += 1;

    let records = app.leaderboard().top_of(view.level);
    if records.is_empty() {
        fb.put_str(x, y, "No scores yet", menu_style().dim());
    }
    for (rank, record) in records.iter().enumerate() {
        let style = if view.highlighted_rank() == Some(rank) {
            CellStyle::new(MENU_BG, accent).bold()
        } else {
            menu_style()
        };
        let row = format!(
            "{:<3} {:<7} {:<6} {:<7} {}",
            rank + 1,
            record.score,
            format!("{}s", record.time_taken_secs),
            record.moves,
            record.player_name
        );
        fb.put_str(x, y + rank as u16, &row, style);
    }
    y += LEADERBOARD_CAPACITY as u16 + 1;

    let help = match view.next_level.and_then(|id| app.catalog().get(id)) {
        Some(next) if view.is_result() => format!("Enter  next level: {}    Esc  menu", next.name),
        _ => "Left/Right  switch level    Esc  menu".to_string(),
    };
    fb.put_str_centered(0, y, viewport.width, &help, menu_style().dim());
}

fn draw_tabs(fb: &mut FrameBuffer, app: &TerminalApp, active: u8, y: u16, viewport: Viewport) {
    let levels: &[LevelConfig] = app.catalog().levels();
    let labels: Vec<String> = levels.iter().map(|l| format!(" Level {} ", l.id)).collect();
    let total: u16 = labels.iter().map(|l| l.chars().count() as u16 + 1).sum();
    let mut x = viewport.width.saturating_sub(total) / 2;
    for (level, label) in levels.iter().zip(&labels) {
        let style = if level.id == active {
            CellStyle::new(MENU_BG, Rgb::from(level.palette.accent)).bold()
        } else {
            menu_style().dim()
        };
        x = fb.put_str(x, y, label, style) + 1;
    }
}
