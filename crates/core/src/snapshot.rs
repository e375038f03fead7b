//! Read-only, copyable view of a session for renderers.

use crate::piece::ActivePiece;
use crate::types::{Cell, PieceKind, Phase, BOARD_HEIGHT, BOARD_WIDTH};

pub type BoardGrid = [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub board: BoardGrid,
    pub active: Option<ActivePiece>,
    pub next: PieceKind,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub high_score: u32,
    pub phase: Phase,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[Cell::Empty; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            next: PieceKind::I,
            score: 0,
            lines: 0,
            level: 1,
            high_score: 0,
            phase: Phase::Idle,
        }
    }
}
