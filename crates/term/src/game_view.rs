//! GameView: draws a [`GameSnapshot`] into a [`FrameBuffer`].
//!
//! Pure, no I/O. Board cells are `cell_w` columns wide so the well keeps a
//! roughly square aspect in typical terminal fonts.

use crate::core::{template_for, GameSnapshot};
use crate::fb::{FrameBuffer, Rgb, Style};
use crate::types::{Cell, Color, Phase, BOARD_HEIGHT, BOARD_WIDTH};

const WELL_BG: Rgb = Rgb::new(30, 30, 40);
const BLACK: Rgb = Rgb::new(0, 0, 0);

/// Largest board cell, in terminal columns or rows.
pub const MAX_CELL_SIZE: u16 = 8;

/// Terminal size in character cells.
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

/// Placement of the well inside the viewport for one frame.
#[derive(Debug, Clone, Copy)]
struct Layout {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

#[derive(Debug, Clone, Copy)]
pub struct GameView {
    cell_w: u16,
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        Self::new(2, 1)
    }
}

impl GameView {
    /// Cell size in terminal columns and rows, clamped to `1..=MAX_CELL_SIZE`.
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.clamp(1, MAX_CELL_SIZE),
            cell_h: cell_h.clamp(1, MAX_CELL_SIZE),
        }
    }

    /// Draw a full frame into a reused framebuffer.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.fill(Style::default().glyph(' '));

        let layout = self.layout(viewport);

        fb.fill_rect(
            layout.x + 1,
            layout.y + 1,
            layout.w - 2,
            layout.h - 2,
            ' ',
            Style::new(WELL_BG, WELL_BG),
        );
        draw_border(fb, layout, Style::new(Rgb::new(200, 200, 200), BLACK));

        for (y, row) in snap.board.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                match cell {
                    Cell::Occupied(color) => self.draw_block(fb, layout, x as i8, y as i8, *color),
                    Cell::Empty => self.fill_well_cell(
                        fb,
                        layout,
                        x as u16,
                        y as u16,
                        '·',
                        Style::new(Rgb::new(90, 90, 100), WELL_BG).dim(),
                    ),
                }
            }
        }

        if let Some(active) = snap.active {
            for (x, y) in active.cells() {
                self.draw_block(fb, layout, x, y, active.color);
            }
        }

        self.draw_side_panel(fb, snap, viewport, layout);

        match snap.phase {
            Phase::Idle => draw_banner(fb, layout, &["PRESS ENTER"]),
            Phase::Paused => draw_banner(fb, layout, &["PAUSED"]),
            Phase::GameOver => draw_banner(fb, layout, &["GAME OVER", "R TO RESET"]),
            Phase::Running => {}
        }
    }

    /// Convenience wrapper that allocates a fresh framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    /// Top-left terminal position of board cell `(x, y)` for this viewport.
    pub fn cell_origin(&self, viewport: Viewport, x: u16, y: u16) -> (u16, u16) {
        let layout = self.layout(viewport);
        (
            layout.x + 1 + x * self.cell_w,
            layout.y + 1 + y * self.cell_h,
        )
    }

    fn layout(&self, viewport: Viewport) -> Layout {
        let w = BOARD_WIDTH as u16 * self.cell_w + 2;
        let h = BOARD_HEIGHT as u16 * self.cell_h + 2;
        let x = viewport.width.saturating_sub(w) / 2;
        let y = viewport.height.saturating_sub(h) / 2;
        Layout { x, y, w, h }
    }

    /// Blocks above the visible well (negative y) are skipped.
    fn draw_block(&self, fb: &mut FrameBuffer, layout: Layout, x: i8, y: i8, color: Color) {
        if x < 0 || y < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
            return;
        }
        let style = Style::new(block_rgb(color), WELL_BG).bold();
        self.fill_well_cell(fb, layout, x as u16, y as u16, '█', style);
    }

    fn fill_well_cell(
        &self,
        fb: &mut FrameBuffer,
        layout: Layout,
        x: u16,
        y: u16,
        ch: char,
        style: Style,
    ) {
        fb.fill_rect(
            layout.x + 1 + x * self.cell_w,
            layout.y + 1 + y * self.cell_h,
            self.cell_w,
            self.cell_h,
            ch,
            style,
        );
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        layout: Layout,
    ) {
        let px = layout.x.saturating_add(layout.w).saturating_add(2);
        if viewport.width.saturating_sub(px) < 10 {
            return;
        }

        let label = Style::default().bold();
        let value = Style::new(Rgb::new(200, 200, 200), BLACK);

        let mut y = layout.y;
        for (name, number) in [
            ("SCORE", snap.score),
            ("HIGH", snap.high_score),
            ("LEVEL", snap.level),
            ("LINES", snap.lines),
        ] {
            fb.put_str(px, y, name, label);
            fb.put_u32(px, y + 1, number, value);
            y += 3;
        }

        fb.put_str(px, y, "NEXT", label);
        y += 1;
        let next = template_for(snap.next);
        let style = Style::new(block_rgb(next.color), BLACK).bold();
        for (sx, sy) in next.shape.cells() {
            fb.fill_rect(
                px + sx as u16 * self.cell_w,
                y + sy as u16 * self.cell_h,
                self.cell_w,
                self.cell_h,
                '█',
                style,
            );
        }
    }
}

pub fn block_rgb(color: Color) -> Rgb {
    match color {
        Color::Cyan => Rgb::new(80, 220, 220),
        Color::Blue => Rgb::new(80, 120, 220),
        Color::Orange => Rgb::new(255, 165, 0),
        Color::Yellow => Rgb::new(240, 220, 80),
        Color::Green => Rgb::new(100, 220, 120),
        Color::Red => Rgb::new(220, 80, 80),
        Color::Purple => Rgb::new(200, 120, 220),
    }
}

fn draw_border(fb: &mut FrameBuffer, l: Layout, style: Style) {
    let (right, bottom) = (l.x + l.w - 1, l.y + l.h - 1);
    fb.put_char(l.x, l.y, '┌', style);
    fb.put_char(right, l.y, '┐', style);
    fb.put_char(l.x, bottom, '└', style);
    fb.put_char(right, bottom, '┘', style);
    for x in l.x + 1..right {
        fb.put_char(x, l.y, '─', style);
        fb.put_char(x, bottom, '─', style);
    }
    for y in l.y + 1..bottom {
        fb.put_char(l.x, y, '│', style);
        fb.put_char(right, y, '│', style);
    }
}

/// Centered lines of text across the middle of the well.
fn draw_banner(fb: &mut FrameBuffer, l: Layout, lines: &[&str]) {
    let style = Style::new(Rgb::new(255, 255, 255), BLACK).bold();
    let top = (l.y + l.h / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, text) in lines.iter().enumerate() {
        let w = text.chars().count() as u16;
        let x = l.x + l.w.saturating_sub(w) / 2;
        fb.put_str(x, top + i as u16, text, style);
    }
}
