//! Placement validity checks.
//!
//! A placement is legal when every filled cell of the shape lands inside the
//! board horizontally, not below the floor, and on an empty cell. Cells above
//! the top edge (y < 0) are allowed and never checked against occupancy.

use thiserror::Error;

use crate::board::Board;
use crate::pieces::Shape;
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH};

/// Why a shape cannot sit at a given anchor.
///
/// This is ordinary control flow (landing, a rotation no-op), never a user-facing failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidPlacement {
    #[error("cell ({x}, {y}) is outside the board")]
    OutOfBounds { x: i8, y: i8 },
    #[error("cell ({x}, {y}) is already occupied")]
    Collision { x: i8, y: i8 },
}

/// Check a shape anchored at (x, y), reporting the first offending cell.
pub fn check_placement(shape: &Shape, x: i8, y: i8, board: &Board) -> Result<(), InvalidPlacement> {
    for (sx, sy) in shape.cells() {
        let (Some(bx), Some(by)) = (x.checked_add(sx), y.checked_add(sy)) else {
            return Err(InvalidPlacement::OutOfBounds {
                x: x.saturating_add(sx),
                y: y.saturating_add(sy),
            });
        };

        if bx < 0 || bx >= BOARD_WIDTH as i8 || by >= BOARD_HEIGHT as i8 {
            return Err(InvalidPlacement::OutOfBounds { x: bx, y: by });
        }
        if by < 0 {
            continue;
        }
        if board.is_occupied(bx, by) {
            return Err(InvalidPlacement::Collision { x: bx, y: by });
        }
    }
    Ok(())
}

/// Whether a shape anchored at (x, y) is a legal placement.
#[inline]
pub fn is_valid_placement(shape: &Shape, x: i8, y: i8, board: &Board) -> bool {
    check_placement(shape, x, y, board).is_ok()
}
