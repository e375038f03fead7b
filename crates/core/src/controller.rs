//! Piece controller - owns the active piece and the queued next piece

use crate::board::Board;
use crate::collision::{check_placement, InvalidPlacement};
use crate::piece::{hard_drop_target, spawn, try_move, try_rotate, ActivePiece};
use crate::rng::PieceGenerator;
use crate::types::PieceKind;

#[derive(Debug, Clone)]
pub struct PieceController {
    active: Option<ActivePiece>,
    next: PieceKind,
    generator: PieceGenerator,
}

impl PieceController {
    /// Controller with no active piece and one freshly drawn next piece.
    pub fn new(mut generator: PieceGenerator) -> Self {
        let next = generator.random_kind();
        Self {
            active: None,
            next,
            generator,
        }
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn next(&self) -> PieceKind {
        self.next
    }

    /// Override the queued next piece (puzzle setups, tests).
    pub fn queue_next(&mut self, kind: PieceKind) {
        self.next = kind;
    }

    /// Promote the queued piece to active at the spawn anchor and draw a new next piece.
    ///
    /// If the spawn anchor is blocked nothing changes except that the active
    /// slot is left empty, and the blocking cell is returned.
    pub fn spawn_next(&mut self, board: &Board) -> Result<(), InvalidPlacement> {
        let piece = spawn(self.next);
        if let Err(err) = check_placement(&piece.shape, piece.x, piece.y, board) {
            self.active = None;
            return Err(err);
        }
        self.active = Some(piece);
        self.next = self.generator.random_kind();
        Ok(())
    }

    /// Translate the active piece. Returns false on rejection or with no active piece.
    pub fn shift(&mut self, dx: i8, dy: i8, board: &Board) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        match try_move(&active, dx, dy, board) {
            Ok(moved) => {
                self.active = Some(moved);
                true
            }
            Err(_) => false,
        }
    }

    /// Rotate the active piece clockwise. Returns false on rejection.
    pub fn rotate(&mut self, board: &Board) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        match try_rotate(&active, board) {
            Ok(rotated) => {
                self.active = Some(rotated);
                true
            }
            Err(_) => false,
        }
    }

    /// Move the active piece to its lowest valid row. Returns rows travelled.
    pub fn hard_drop(&mut self, board: &Board) -> u8 {
        let Some(active) = self.active else {
            return 0;
        };
        let target = hard_drop_target(&active, board);
        self.active = Some(ActivePiece { y: target, ..active });
        u8::try_from(i16::from(target) - i16::from(active.y)).unwrap_or(u8::MAX)
    }

    /// Remove the active piece (it is about to be merged).
    pub fn take_active(&mut self) -> Option<ActivePiece> {
        self.active.take()
    }

    /// Drop the active piece and queue a fresh next piece.
    pub fn reset(&mut self) {
        self.active = None;
        self.next = self.generator.random_kind();
    }

    /// Replace the active piece directly (puzzle setups, tests).
    pub fn set_active(&mut self, piece: Option<ActivePiece>) {
        self.active = piece;
    }
}
