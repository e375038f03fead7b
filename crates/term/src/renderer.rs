//! TerminalRenderer: turns snapshots into terminal output.
//!
//! Each frame is drawn into a framebuffer, diffed against the previous frame,
//! and only the changed runs are written.

use std::io::{self, Write};
use std::mem;

use anyhow::Result;
use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::core::GameSnapshot;
use crate::engine::Renderer;
use crate::fb::{FrameBuffer, Rgb, Style};
use crate::game_view::{GameView, Viewport};

pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    view: GameView,
    viewport: Viewport,
    frame: FrameBuffer,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl TerminalRenderer<io::Stdout> {
    /// Renderer on stdout sized to the current terminal.
    pub fn stdout() -> Result<Self> {
        let (w, h) = terminal::size()?;
        Ok(Self::with_writer(io::stdout(), Viewport::new(w, h)))
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn with_writer(out: W, viewport: Viewport) -> Self {
        Self {
            out,
            view: GameView::default(),
            viewport,
            frame: FrameBuffer::new(viewport.width, viewport.height),
            last: None,
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    /// The most recently flushed frame.
    pub fn last_frame(&self) -> Option<&FrameBuffer> {
        self.last.as_ref()
    }

    fn present(&mut self) -> Result<()> {
        self.buf.clear();
        match self.last.take() {
            Some(prev)
                if prev.width() == self.frame.width() && prev.height() == self.frame.height() =>
            {
                encode_diff_into(&prev, &self.frame, &mut self.buf)?;
                self.flush_buf()?;
                // Old frame becomes the next scratch buffer.
                self.last = Some(mem::replace(&mut self.frame, prev));
            }
            _ => {
                encode_full_into(&self.frame, &mut self.buf)?;
                self.flush_buf()?;
                self.last = Some(self.frame.clone());
            }
        }
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.out.write_all(&self.buf)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, snapshot: &GameSnapshot) -> Result<()> {
        self.view.render_into(snapshot, self.viewport, &mut self.frame);
        self.present()
    }

    /// The next frame after a resize is a full redraw.
    fn resize(&mut self, width: u16, height: u16) {
        self.viewport = Viewport::new(width, height);
        self.last = None;
    }
}

/// Switch the terminal into raw mode on the alternate screen.
pub fn enter_terminal() -> Result<()> {
    terminal::enable_raw_mode()?;
    let mut out = io::stdout();
    out.queue(terminal::EnterAlternateScreen)?;
    out.queue(cursor::Hide)?;
    out.queue(terminal::DisableLineWrap)?;
    out.flush()?;
    Ok(())
}

/// Undo [`enter_terminal`].
pub fn leave_terminal() -> Result<()> {
    let mut out = io::stdout();
    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(terminal::EnableLineWrap)?;
    out.queue(cursor::Show)?;
    out.queue(terminal::LeaveAlternateScreen)?;
    out.flush()?;
    terminal::disable_raw_mode()?;
    Ok(())
}

/// Encode a full-frame redraw into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut style: Option<Style> = None;
    for y in 0..fb.height() {
        out.queue(cursor::MoveTo(0, y))?;
        for x in 0..fb.width() {
            let g = fb.get(x, y).unwrap_or_default();
            if style != Some(g.style) {
                apply_style_into(out, g.style)?;
                style = Some(g.style);
            }
            out.queue(Print(g.ch))?;
        }
    }
    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

/// Encode only the runs that differ between `prev` and `next`.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut style: Option<Style> = None;
    for (x, y, len) in changed_runs(prev, next) {
        out.queue(cursor::MoveTo(x, y))?;
        for dx in 0..len {
            let g = next.get(x + dx, y).unwrap_or_default();
            if style != Some(g.style) {
                apply_style_into(out, g.style)?;
                style = Some(g.style);
            }
            out.queue(Print(g.ch))?;
        }
    }
    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn apply_style_into(out: &mut Vec<u8>, style: Style) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(SetForegroundColor(term_color(style.fg)))?;
    out.queue(SetBackgroundColor(term_color(style.bg)))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        out.queue(SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

fn term_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Horizontal runs `(x, y, len)` of glyphs that differ. Mismatched sizes
/// mark every row dirty.
fn changed_runs<'a>(
    prev: &'a FrameBuffer,
    next: &'a FrameBuffer,
) -> impl Iterator<Item = (u16, u16, u16)> + 'a {
    let same_size = prev.width() == next.width() && prev.height() == next.height();
    let w = next.width();
    (0..next.height()).flat_map(move |y| {
        let mut runs = Vec::new();
        if !same_size {
            runs.push((0, y, w));
            return runs;
        }
        let mut x = 0;
        while x < w {
            if prev.get(x, y) == next.get(x, y) {
                x += 1;
                continue;
            }
            let start = x;
            while x < w && prev.get(x, y) != next.get(x, y) {
                x += 1;
            }
            runs.push((start, y, x - start));
        }
        runs
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Phase;

    #[test]
    fn adjacent_changes_coalesce_into_one_run() {
        let a = FrameBuffer::new(5, 1);
        let mut b = FrameBuffer::new(5, 1);
        for x in 1..=3 {
            b.set(x, 0, Style::default().glyph('X'));
        }
        let runs: Vec<_> = changed_runs(&a, &b).collect();
        assert_eq!(runs, vec![(1, 0, 3)]);
    }

    #[test]
    fn identical_frames_have_no_runs() {
        let a = FrameBuffer::new(4, 3);
        assert_eq!(changed_runs(&a, &a.clone()).count(), 0);
    }

    #[test]
    fn second_identical_frame_writes_only_resets() {
        let mut r = TerminalRenderer::with_writer(Vec::new(), Viewport::new(60, 24));
        let snap = GameSnapshot::default();
        r.render(&snap).unwrap();
        let first = r.writer().len();
        r.render(&snap).unwrap();
        let second = r.writer().len() - first;
        assert!(first > 0);
        assert!(second < 32, "diff of unchanged frame wrote {second} bytes");
    }

    #[test]
    fn resize_forces_full_redraw() {
        let mut r = TerminalRenderer::with_writer(Vec::new(), Viewport::new(60, 24));
        r.render(&GameSnapshot::default()).unwrap();
        r.resize(70, 30);
        assert!(r.last_frame().is_none());
        r.render(&GameSnapshot::default()).unwrap();
        assert_eq!(r.last_frame().map(|fb| fb.width()), Some(70));
    }

    #[test]
    fn phase_change_redraws_overlay() {
        let mut r = TerminalRenderer::with_writer(Vec::new(), Viewport::new(60, 24));
        r.render(&GameSnapshot::default()).unwrap();
        let paused = GameSnapshot {
            phase: Phase::Paused,
            ..GameSnapshot::default()
        };
        r.render(&paused).unwrap();
        let text = r
            .last_frame()
            .map(|fb| (0..fb.height()).map(|y| fb.row_text(y)).collect::<String>())
            .unwrap_or_default();
        assert!(text.contains("PAUSED"));
    }
}
