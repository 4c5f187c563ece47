//! BoardView: maps a `SessionSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{LevelConfig, SessionSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::presenter::TerminalPresenter;
use crate::types::{CardFace, Cell, MotifIndex, Phase, UrgencyTier};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

const PANEL_W: u16 = 24;
const WARNING_FG: Rgb = Rgb::new(255, 165, 0);
const CRITICAL_FG: Rgb = Rgb::new(230, 60, 60);

/// Card grid plus side panel.
pub struct BoardView {
    /// Card width in terminal columns.
    card_w: u16,
    /// Card height in terminal rows.
    card_h: u16,
    gap: u16,
}

impl Default for BoardView {
    fn default() -> Self {
        // 7x3 leaves room for a centred glyph and a one-column shake.
        Self {
            card_w: 7,
            card_h: 3,
            gap: 1,
        }
    }
}

/// Where the board landed on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    pub x: u16,
    pub y: u16,
    pub frame_w: u16,
    pub frame_h: u16,
}

impl BoardView {
    pub fn new(card_w: u16, card_h: u16, gap: u16) -> Self {
        Self {
            card_w: card_w.max(3),
            card_h: card_h.max(1),
            gap,
        }
    }

    /// Screen position of the top-left corner of `cell` (before shaking).
    pub fn card_origin(&self, layout: BoardLayout, cell: Cell) -> (u16, u16) {
        let x = layout.x + 2 + (cell.col as u16) * (self.card_w + self.gap);
        let y = layout.y + 1 + (cell.row as u16) * (self.card_h + self.gap);
        (x, y)
    }

    pub fn layout(&self, rows: u8, cols: u8, viewport: Viewport) -> BoardLayout {
        let grid_w = span(cols as u16, self.card_w, self.gap);
        let grid_h = span(rows as u16, self.card_h, self.gap);
        let frame_w = grid_w + 4;
        let frame_h = grid_h + 2;
        let total_w = frame_w + 2 + PANEL_W;
        BoardLayout {
            x: viewport.width.saturating_sub(total_w) / 2,
            y: viewport.height.saturating_sub(frame_h) / 2,
            frame_w,
            frame_h,
        }
    }

    /// Render the board into an existing framebuffer (cleared first).
    pub fn render_into(
        &self,
        snap: &SessionSnapshot,
        level: &LevelConfig,
        presenter: &TerminalPresenter,
        cursor: Option<Cell>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) -> BoardLayout {
        let palette = level.palette;
        let background = Rgb::from(palette.background);
        let text = Rgb::from(palette.text);

        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::new(text, background).glyph(' '));

        let layout = self.layout(snap.rows, snap.cols, viewport);
        let border = CellStyle::new(Rgb::from(palette.accent), background);
        fb.draw_box(layout.x, layout.y, layout.frame_w, layout.frame_h, border);

        for (i, cell_snap) in snap.cells.iter().enumerate() {
            let cell = Cell::from_index(i, snap.cols);
            let (x, y) = self.card_origin(layout, cell);
            let x = shifted(x, presenter.shake_offset(cell));
            let glyph = cell_snap.motif.map(|m| motif_glyph(level, m)).unwrap_or(' ');
            self.draw_card(fb, x, y, cell_snap.face, glyph, level, presenter.flash_lit());
            if cursor == Some(cell) && snap.phase == Phase::Running {
                self.draw_cursor(fb, x, y, level);
            }
        }

        self.draw_side_panel(fb, snap, level, presenter, layout, viewport);
        layout
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &SessionSnapshot,
        level: &LevelConfig,
        presenter: &TerminalPresenter,
        cursor: Option<Cell>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, level, presenter, cursor, viewport, &mut fb);
        fb
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_card(
        &self,
        fb: &mut FrameBuffer,
        x: u16,
        y: u16,
        face: CardFace,
        glyph: char,
        level: &LevelConfig,
        flash_lit: bool,
    ) {
        let palette = level.palette;
        let back = Rgb::from(palette.card_back);
        let accent = Rgb::from(palette.accent);
        let text = Rgb::from(palette.text);

        let (fill, style) = match face {
            CardFace::FaceDown => ('░', CellStyle::new(back.mix(text, 60), back)),
            CardFace::FaceUp => (' ', CellStyle::new(back, text).bold()),
            CardFace::Matched if flash_lit => (' ', CellStyle::new(back, accent).bold()),
            CardFace::Matched => (' ', CellStyle::new(text, accent.mix(back, 140))),
        };
        fb.fill_rect(x, y, self.card_w, self.card_h, fill, style);
        if face != CardFace::FaceDown {
            let mid_x = x + self.card_w / 2;
            let mid_y = y + self.card_h / 2;
            fb.put_char(mid_x, mid_y, glyph, style);
        }
    }

    fn draw_cursor(&self, fb: &mut FrameBuffer, x: u16, y: u16, level: &LevelConfig) {
        let style = CellStyle::new(
            Rgb::from(level.palette.accent),
            Rgb::from(level.palette.background),
        )
        .bold();
        let mid_y = y + self.card_h / 2;
        fb.put_char(x.saturating_sub(1), mid_y, '▶', style);
        fb.put_char(x + self.card_w, mid_y, '◀', style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        level: &LevelConfig,
        presenter: &TerminalPresenter,
        layout: BoardLayout,
        viewport: Viewport,
    ) {
        let panel_x = layout.x + layout.frame_w + 2;
        if panel_x >= viewport.width {
            return;
        }
        let background = Rgb::from(level.palette.background);
        let label = CellStyle::new(Rgb::from(level.palette.accent), background).bold();
        let value = CellStyle::new(Rgb::from(level.palette.text), background);

        let mut y = layout.y;
        let x = fb.put_str(panel_x, y, "LEVEL ", label);
        fb.put_u32(x, y, level.id as u32, label);
        y += 1;
        fb.put_str(panel_x, y, level.name, value);
        y += 2;

        fb.put_str(panel_x, y, "PLAYER", label);
        y += 1;
        fb.put_str(panel_x, y, &snap.player_name, value);
        y += 2;

        fb.put_str(panel_x, y, "TIME", label);
        y += 1;
        let time_style = match snap.tier {
            UrgencyTier::Normal => value,
            UrgencyTier::Warning => CellStyle { fg: WARNING_FG, ..value }.bold(),
            UrgencyTier::Critical => CellStyle { fg: CRITICAL_FG, ..value }.bold(),
        };
        let x = fb.put_u32(panel_x, y, snap.remaining_secs, time_style);
        fb.put_char(x, y, 's', time_style);
        y += 2;

        fb.put_str(panel_x, y, "MOVES", label);
        y += 1;
        fb.put_u32(panel_x, y, snap.moves, value);
        y += 2;

        fb.put_str(panel_x, y, "PAIRS", label);
        y += 1;
        let x = fb.put_u32(panel_x, y, snap.matched_pairs, value);
        fb.put_char(x, y, '/', value);
        fb.put_u32(x + 1, y, snap.total_pairs, value);
        y += 2;

        if let Some(cue) = presenter.cue() {
            fb.put_str(panel_x, y, cue.label(), label);
        }
        y += 1;

        if let Some(win) = presenter.win() {
            let x = fb.put_str(panel_x, y, "SCORE ", label);
            fb.put_u32(x, y, win.score, label);
        }
    }
}

/// Total extent of `n` items of `size` separated by `gap`.
fn span(n: u16, size: u16, gap: u16) -> u16 {
    if n == 0 {
        return 0;
    }
    n * size + (n - 1) * gap
}

fn shifted(x: u16, offset: i8) -> u16 {
    if offset < 0 {
        x.saturating_sub(offset.unsigned_abs() as u16)
    } else {
        x.saturating_add(offset as u16)
    }
}

fn motif_glyph(level: &LevelConfig, motif: MotifIndex) -> char {
    if motif.is_blank() {
        return ' ';
    }
    level.motifs.get(motif.get()).map(|m| m.glyph).unwrap_or('?')
}
