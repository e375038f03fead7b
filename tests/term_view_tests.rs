//! Terminal view rendering of live sessions

use blockfall::core::Session;
use blockfall::engine::Renderer;
use blockfall::term::{block_rgb, GameView, TerminalRenderer, Viewport};
use blockfall::types::Command;

fn screen(view: &GameView, session: &Session, vp: Viewport) -> String {
    let fb = view.render(&session.snapshot(), vp);
    (0..fb.height())
        .map(|y| fb.row_text(y))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_active_piece_is_drawn() {
    let mut session = Session::with_seed(8);
    session.apply(Command::Start.into());
    let active = *session.active().unwrap();

    let view = GameView::default();
    let vp = Viewport::new(80, 24);
    let fb = view.render(&session.snapshot(), vp);

    for (x, y) in active.cells().filter(|&(_, y)| y >= 0) {
        let (px, py) = view.cell_origin(vp, x as u16, y as u16);
        let glyph = fb.get(px, py).unwrap();
        assert_eq!(glyph.ch, '█');
        assert_eq!(glyph.style.fg, block_rgb(active.color));
    }
}

#[test]
fn test_panel_tracks_counters() {
    let mut session = Session::with_seed(8);
    session.set_high_score(4321);
    session.set_progress(1700, 23);
    session.apply(Command::Start.into());

    let text = screen(&GameView::default(), &session, Viewport::new(80, 24));
    for needle in ["SCORE", "1700", "HIGH", "4321", "LEVEL", "LINES", "23", "NEXT"] {
        assert!(text.contains(needle), "missing {needle}");
    }
}

#[test]
fn test_overlays_follow_lifecycle() {
    let view = GameView::default();
    let vp = Viewport::new(80, 24);
    let mut session = Session::with_seed(8);
    assert!(screen(&view, &session, vp).contains("PRESS ENTER"));

    session.apply(Command::Start.into());
    session.apply(Command::TogglePause.into());
    assert!(screen(&view, &session, vp).contains("PAUSED"));

    session.apply(Command::Reset.into());
    assert!(screen(&view, &session, vp).contains("PRESS ENTER"));
}

#[test]
fn test_terminal_renderer_writes_frames() {
    let mut session = Session::with_seed(8);
    let mut renderer = TerminalRenderer::with_writer(Vec::new(), Viewport::new(80, 24));
    renderer.render(&session.snapshot()).unwrap();
    let full = renderer.writer().len();

    session.apply(Command::Start.into());
    renderer.render(&session.snapshot()).unwrap();
    let diff = renderer.writer().len() - full;
    assert!(diff > 0 && diff < full);
}
