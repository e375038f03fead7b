//! Piece controller operations - spawn, move, rotate, hard-drop targeting
//!
//! Every operation is pure: it either returns a new [`ActivePiece`] or the
//! reason the candidate placement was rejected. Nothing here mutates a board.

use crate::board::Board;
use crate::collision::{check_placement, is_valid_placement, InvalidPlacement};
use crate::pieces::{template_for, Shape};
use crate::types::{Color, PieceKind, SPAWN_X, SPAWN_Y};

/// The falling, player-controlled piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: PieceKind,
    /// Current (possibly rotated) shape; always the template's dimensions.
    pub shape: Shape,
    pub x: i8,
    pub y: i8,
    pub color: Color,
}

impl ActivePiece {
    /// Unrotated piece of `kind` anchored at (x, y).
    pub fn new(kind: PieceKind, x: i8, y: i8) -> Self {
        let template = template_for(kind);
        Self {
            kind,
            shape: template.shape,
            x,
            y,
            color: template.color,
        }
    }

    /// Filled cells in board coordinates.
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.shape
            .cells()
            .map(move |(sx, sy)| (self.x.saturating_add(sx), self.y.saturating_add(sy)))
    }

    pub fn is_valid(&self, board: &Board) -> bool {
        is_valid_placement(&self.shape, self.x, self.y, board)
    }
}

/// New piece at the spawn anchor with the unrotated template.
pub fn spawn(kind: PieceKind) -> ActivePiece {
    ActivePiece::new(kind, SPAWN_X, SPAWN_Y)
}

/// Translate by (dx, dy) if the destination is legal.
pub fn try_move(
    piece: &ActivePiece,
    dx: i8,
    dy: i8,
    board: &Board,
) -> Result<ActivePiece, InvalidPlacement> {
    let (Some(x), Some(y)) = (piece.x.checked_add(dx), piece.y.checked_add(dy)) else {
        return Err(InvalidPlacement::OutOfBounds {
            x: piece.x.saturating_add(dx),
            y: piece.y.saturating_add(dy),
        });
    };
    check_placement(&piece.shape, x, y, board)?;
    Ok(ActivePiece { x, y, ..*piece })
}

/// Rotate 90° clockwise in place (same anchor, no wall kicks).
pub fn try_rotate(piece: &ActivePiece, board: &Board) -> Result<ActivePiece, InvalidPlacement> {
    let shape = piece.shape.rotated_cw();
    check_placement(&shape, piece.x, piece.y, board)?;
    Ok(ActivePiece { shape, ..*piece })
}

/// Lowest row the piece can reach by falling straight down.
///
/// Equals the current `y` if it cannot descend at all.
pub fn hard_drop_target(piece: &ActivePiece, board: &Board) -> i8 {
    let mut y = piece.y;
    while let Some(below) = y.checked_add(1) {
        if !is_valid_placement(&piece.shape, piece.x, below, board) {
            break;
        }
        y = below;
    }
    y
}
