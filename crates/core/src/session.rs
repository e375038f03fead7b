//! Game session - lifecycle state machine, scoring, and landing sequence
//!
//! A [`Session`] is a single-writer value. Every event goes through
//! [`Session::apply`], which performs the whole transition (including
//! merge → line clear → respawn on landing) before returning, so no caller
//! can ever observe a half-updated board.
//!
//! ```text
//!            start / toggle               toggle
//!   Idle ───────────────────► Running ◄──────────► Paused
//!    ▲                           │
//!    │ reset (from any phase)    │ spawn blocked after landing
//!    └────────────────────── GameOver
//! ```

use crate::board::{Board, FullRows};
use crate::controller::PieceController;
use crate::piece::ActivePiece;
use crate::rng::PieceGenerator;
use crate::scoring::{level_for_lines, line_clear_score};
use crate::snapshot::GameSnapshot;
use crate::types::{Command, Event, PieceKind, Phase};

/// Score, line and level counters plus the session high score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionStats {
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub high_score: u32,
}

impl SessionStats {
    pub fn new(high_score: u32) -> Self {
        Self {
            score: 0,
            lines: 0,
            level: 1,
            high_score,
        }
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new(0)
    }
}

/// What a landing did to the board and the counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Landing {
    /// The piece as it was merged.
    pub piece: ActivePiece,
    /// Cleared row indices, top to bottom, as they were before the clear.
    pub cleared_rows: FullRows,
    pub score_delta: u32,
    /// The next piece could not be placed at the spawn anchor.
    pub spawn_blocked: bool,
}

impl Landing {
    pub fn rows_cleared(&self) -> usize {
        self.cleared_rows.len()
    }
}

/// Report of a single applied event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Anything observable changed (drives rendering).
    pub changed: bool,
    pub from: Phase,
    pub to: Phase,
    pub landing: Option<Landing>,
    pub level_changed: bool,
    /// Set when the session just finished above the previous high score.
    pub new_high_score: Option<u32>,
}

impl Transition {
    fn ignored(phase: Phase) -> Self {
        Self {
            changed: false,
            from: phase,
            to: phase,
            landing: None,
            level_changed: false,
            new_high_score: None,
        }
    }

    pub fn phase_changed(&self) -> bool {
        self.from != self.to
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    board: Board,
    pieces: PieceController,
    stats: SessionStats,
    phase: Phase,
}

impl Session {
    /// Idle session with an empty board and a queued next piece.
    pub fn new(generator: PieceGenerator, high_score: u32) -> Self {
        Self {
            board: Board::new(),
            pieces: PieceController::new(generator),
            stats: SessionStats::new(high_score),
            phase: Phase::Idle,
        }
    }

    /// Deterministic session for the given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(PieceGenerator::from_seed(seed), 0)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for puzzle setups and tests.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn pieces_mut(&mut self) -> &mut PieceController {
        &mut self.pieces
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.pieces.active()
    }

    pub fn next(&self) -> PieceKind {
        self.pieces.next()
    }

    pub fn score(&self) -> u32 {
        self.stats.score
    }

    pub fn lines(&self) -> u32 {
        self.stats.lines
    }

    pub fn level(&self) -> u32 {
        self.stats.level
    }

    pub fn high_score(&self) -> u32 {
        self.stats.high_score
    }

    /// Replace the known high score (loaded from storage at startup).
    pub fn set_high_score(&mut self, high_score: u32) {
        self.stats.high_score = high_score;
    }

    /// Overwrite score and line counters, keeping level consistent with lines.
    pub fn set_progress(&mut self, score: u32, lines: u32) {
        self.stats.score = score;
        self.stats.lines = lines;
        self.stats.level = level_for_lines(lines);
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        for (dst, src) in out.board.iter_mut().zip(self.board.rows()) {
            dst.copy_from_slice(src);
        }
        out.active = self.pieces.active().copied();
        out.next = self.pieces.next();
        out.score = self.stats.score;
        out.lines = self.stats.lines;
        out.level = self.stats.level;
        out.high_score = self.stats.high_score;
        out.phase = self.phase;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Apply one event atomically and report what happened.
    ///
    /// Commands that are not valid in the current phase are ignored and
    /// reported as an unchanged transition.
    pub fn apply(&mut self, event: Event) -> Transition {
        let from = self.phase;
        let level_before = self.stats.level;

        let mut transition = match (self.phase, event) {
            (_, Event::Command(Command::Reset)) => self.reset(),
            (Phase::GameOver, _) => return Transition::ignored(from),

            (Phase::Idle | Phase::Paused, Event::Command(Command::Start | Command::TogglePause)) => {
                self.resume()
            }
            (Phase::Running, Event::Command(Command::TogglePause)) => {
                self.phase = Phase::Paused;
                self.changed()
            }
            (Phase::Running, Event::Gravity | Event::Command(Command::SoftDrop)) => {
                self.step_down()
            }
            (Phase::Running, Event::Command(Command::MoveLeft)) => {
                let moved = self.pieces.shift(-1, 0, &self.board);
                self.changed_if(moved)
            }
            (Phase::Running, Event::Command(Command::MoveRight)) => {
                let moved = self.pieces.shift(1, 0, &self.board);
                self.changed_if(moved)
            }
            (Phase::Running, Event::Command(Command::RotateCw)) => {
                let rotated = self.pieces.rotate(&self.board);
                self.changed_if(rotated)
            }
            (Phase::Running, Event::Command(Command::HardDrop)) => {
                let rows = self.pieces.hard_drop(&self.board);
                self.changed_if(rows > 0)
            }

            _ => return Transition::ignored(from),
        };

        transition.from = from;
        transition.to = self.phase;
        transition.level_changed = self.stats.level != level_before;
        transition
    }

    fn changed(&self) -> Transition {
        self.changed_if(true)
    }

    fn changed_if(&self, changed: bool) -> Transition {
        Transition {
            changed,
            ..Transition::ignored(self.phase)
        }
    }

    /// Enter Running, spawning the queued piece if nothing is falling yet.
    fn resume(&mut self) -> Transition {
        self.phase = Phase::Running;
        if self.pieces.active().is_none() && self.pieces.spawn_next(&self.board).is_err() {
            return self.finish();
        }
        self.changed()
    }

    /// One row of descent; a blocked descent lands the piece.
    fn step_down(&mut self) -> Transition {
        if self.pieces.shift(0, 1, &self.board) {
            return self.changed();
        }
        match self.pieces.take_active() {
            Some(piece) => self.land(piece),
            // Running without a piece only happens if a spawn was skipped; recover by spawning.
            None => {
                if self.pieces.spawn_next(&self.board).is_err() {
                    return self.finish();
                }
                self.changed()
            }
        }
    }

    /// Merge → clear → score → respawn, as one step.
    fn land(&mut self, piece: ActivePiece) -> Transition {
        self.board.merge(&piece);

        let cleared_rows = self.board.scan_full_rows();
        let cleared = self.board.clear_rows(&cleared_rows);

        let score_delta = line_clear_score(cleared);
        self.stats.score = self.stats.score.saturating_add(score_delta);
        self.stats.lines = self.stats.lines.saturating_add(cleared as u32);
        self.stats.level = level_for_lines(self.stats.lines);

        let spawn_blocked = self.pieces.spawn_next(&self.board).is_err();
        let mut transition = if spawn_blocked {
            self.finish()
        } else {
            self.changed()
        };

        transition.landing = Some(Landing {
            piece,
            cleared_rows,
            score_delta,
            spawn_blocked,
        });
        transition
    }

    /// Enter GameOver and fold the score into the high score.
    fn finish(&mut self) -> Transition {
        self.phase = Phase::GameOver;
        self.pieces.set_active(None);

        let mut transition = self.changed();
        if self.stats.score > self.stats.high_score {
            self.stats.high_score = self.stats.score;
            transition.new_high_score = Some(self.stats.score);
        }
        transition
    }

    /// Back to Idle: empty board, zeroed counters, high score kept.
    fn reset(&mut self) -> Transition {
        self.board.reset();
        self.pieces.reset();
        self.stats = SessionStats::new(self.stats.high_score);
        self.phase = Phase::Idle;
        self.changed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, Color, BOARD_WIDTH};

    fn running(seed: u64) -> Session {
        let mut session = Session::with_seed(seed);
        session.apply(Command::Start.into());
        session
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = Session::with_seed(12345);
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.active().is_none());
        assert_eq!(session.score(), 0);
        assert_eq!(session.lines(), 0);
        assert_eq!(session.level(), 1);
        assert_eq!(session.board().occupied_count(), 0);
    }

    #[test]
    fn test_start_spawns_queued_piece() {
        let mut session = Session::with_seed(12345);
        let queued = session.next();
        let t = session.apply(Command::Start.into());

        assert!(t.changed);
        assert_eq!((t.from, t.to), (Phase::Idle, Phase::Running));
        assert_eq!(session.active().map(|p| p.kind), Some(queued));
    }

    #[test]
    fn test_toggle_pause_starts_idle_session() {
        let mut session = Session::with_seed(12345);
        session.apply(Command::TogglePause.into());
        assert_eq!(session.phase(), Phase::Running);
        assert!(session.active().is_some());
    }

    #[test]
    fn test_pause_preserves_piece() {
        let mut session = running(12345);
        let before = session.active().copied();

        session.apply(Command::TogglePause.into());
        assert_eq!(session.phase(), Phase::Paused);
        assert_eq!(session.active().copied(), before);

        session.apply(Command::TogglePause.into());
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.active().copied(), before);
    }

    #[test]
    fn test_movement_ignored_while_paused() {
        let mut session = running(12345);
        session.apply(Command::TogglePause.into());
        let before = session.active().copied();

        for cmd in [Command::MoveLeft, Command::MoveRight, Command::RotateCw, Command::HardDrop] {
            let t = session.apply(cmd.into());
            assert!(!t.changed);
        }
        assert!(!session.apply(Event::Gravity).changed);
        assert_eq!(session.active().copied(), before);
    }

    #[test]
    fn test_start_while_running_is_ignored() {
        let mut session = running(12345);
        let t = session.apply(Command::Start.into());
        assert!(!t.changed);
        assert_eq!(session.phase(), Phase::Running);
    }

    #[test]
    fn test_gravity_moves_piece_down() {
        let mut session = running(12345);
        let y = session.active().unwrap().y;
        let t = session.apply(Event::Gravity);
        assert!(t.changed);
        assert!(t.landing.is_none());
        assert_eq!(session.active().unwrap().y, y + 1);
    }

    #[test]
    fn test_hard_drop_does_not_land_until_next_step() {
        let mut session = running(12345);
        session.pieces.set_active(Some(ActivePiece::new(PieceKind::O, 4, 0)));

        let t = session.apply(Command::HardDrop.into());
        assert!(t.landing.is_none());
        assert_eq!(session.active().unwrap().y, 18);

        let t = session.apply(Command::SoftDrop.into());
        assert!(t.landing.is_some());
        assert_eq!(session.board().occupied_count(), 4);
    }

    #[test]
    fn test_landing_scores_cleared_rows() {
        let mut session = running(1);
        for y in 18..20 {
            for x in 0..BOARD_WIDTH as i8 {
                if x != 4 && x != 5 {
                    session.board.set(x, y, Cell::Occupied(Color::Blue));
                }
            }
        }
        session.pieces.set_active(Some(ActivePiece::new(PieceKind::O, 4, 18)));

        let t = session.apply(Event::Gravity);
        let landing = t.landing.expect("landing");
        assert_eq!(landing.rows_cleared(), 2);
        assert_eq!(landing.score_delta, 300);
        assert_eq!(session.score(), 300);
        assert_eq!(session.lines(), 2);
        assert_eq!(session.board().occupied_count(), 0);
        assert_eq!(session.phase(), Phase::Running);
    }

    #[test]
    fn test_level_up_is_reported() {
        let mut session = running(1);
        session.set_progress(0, 9);
        for x in 0..BOARD_WIDTH as i8 {
            if x != 4 && x != 5 {
                session.board.set(x, 19, Cell::Occupied(Color::Blue));
            }
        }
        session.pieces.set_active(Some(ActivePiece::new(PieceKind::O, 4, 18)));

        let t = session.apply(Event::Gravity);
        assert!(t.level_changed);
        assert_eq!(session.level(), 2);
        assert_eq!(session.lines(), 10);
    }

    #[test]
    fn test_game_over_when_spawn_blocked() {
        let mut session = running(1);
        session.set_progress(700, 3);
        session.set_high_score(500);
        // Wall across row 1 under the spawn area, leaving the board columns 0..=2 open.
        for x in 3..BOARD_WIDTH as i8 {
            session.board.set(x, 1, Cell::Occupied(Color::Red));
        }
        session.pieces.set_active(Some(ActivePiece::new(PieceKind::O, 0, 18)));
        session.pieces.queue_next(PieceKind::T);

        let t = session.apply(Event::Gravity);
        assert_eq!(t.to, Phase::GameOver);
        assert_eq!(t.new_high_score, Some(700));
        assert!(t.landing.as_ref().unwrap().spawn_blocked);
        assert_eq!(session.high_score(), 700);
        assert!(session.active().is_none());
    }

    #[test]
    fn test_game_over_keeps_higher_previous_high_score() {
        let mut session = running(1);
        session.set_progress(100, 1);
        session.set_high_score(900);
        session.pieces.set_active(Some(ActivePiece::new(PieceKind::O, 0, 18)));
        session.pieces.queue_next(PieceKind::I);
        // I spawns on row 1 only, so filling its four cells blocks the spawn.
        for x in 3..7 {
            session.board.set(x, 1, Cell::Occupied(Color::Red));
        }

        let t = session.apply(Event::Gravity);
        assert_eq!(t.to, Phase::GameOver);
        assert_eq!(t.new_high_score, None);
        assert_eq!(session.high_score(), 900);
    }

    #[test]
    fn test_game_over_ignores_everything_but_reset() {
        let mut session = running(1);
        session.phase = Phase::GameOver;
        session.pieces.set_active(None);

        for cmd in [Command::Start, Command::TogglePause, Command::MoveLeft, Command::SoftDrop] {
            assert!(!session.apply(cmd.into()).changed);
            assert_eq!(session.phase(), Phase::GameOver);
        }
        assert!(!session.apply(Event::Gravity).changed);

        let t = session.apply(Command::Reset.into());
        assert_eq!((t.from, t.to), (Phase::GameOver, Phase::Idle));
    }

    #[test]
    fn test_reset_keeps_high_score() {
        let mut session = running(1);
        session.set_progress(500, 12);
        session.set_high_score(300);
        session.board.set(0, 19, Cell::Occupied(Color::Green));

        session.apply(Command::Reset.into());
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.score(), 0);
        assert_eq!(session.lines(), 0);
        assert_eq!(session.level(), 1);
        assert_eq!(session.high_score(), 300);
        assert!(session.active().is_none());
        assert_eq!(session.board().occupied_count(), 0);
    }

    #[test]
    fn test_snapshot_mirrors_session() {
        let mut session = running(5);
        session.board.set(2, 19, Cell::Occupied(Color::Orange));
        let snap = session.snapshot();
        assert_eq!(snap.board[19][2], Cell::Occupied(Color::Orange));
        assert_eq!(snap.active, session.active().copied());
        assert_eq!(snap.next, session.next());
        assert_eq!(snap.phase, Phase::Running);
        assert_eq!(snap.level, 1);
    }
}
