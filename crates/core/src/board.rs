//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell is empty or occupied with a color.
//! Uses a flat array for cache locality and zero allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom)

use arrayvec::ArrayVec;

use crate::piece::ActivePiece;
use crate::types::{Cell, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Upper bound on the number of rows any scan can report.
pub const MAX_ROWS: usize = BOARD_HEIGHT as usize;

/// Row indices reported by [`Board::scan_full_rows`], top to bottom.
pub type FullRows = ArrayVec<usize, MAX_ROWS>;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; BOARD_SIZE],
        }
    }

    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y). Returns None if out of bounds.
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y). Returns false if out of bounds.
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// True iff (x, y) is inside the board and unoccupied.
    pub fn is_empty(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Cell::Empty))
    }

    /// True iff (x, y) is inside the board and occupied.
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Cell::Occupied(_)))
    }

    /// One row of cells, left to right.
    pub fn row(&self, y: usize) -> &[Cell] {
        let width = BOARD_WIDTH as usize;
        let start = y * width;
        &self.cells[start..start + width]
    }

    /// All rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks_exact(BOARD_WIDTH as usize)
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        self.row(y).iter().all(Cell::is_occupied)
    }

    /// Write the piece's filled cells into the grid using the piece color.
    ///
    /// Cells above the visible board (y < 0) are skipped. Cells that fall
    /// outside the board horizontally or below it are skipped too; callers are
    /// expected to merge only pieces that passed the placement check.
    pub fn merge(&mut self, piece: &ActivePiece) {
        let cell = Cell::Occupied(piece.color);
        for (sx, sy) in piece.shape.cells() {
            let (Some(x), Some(y)) = (piece.x.checked_add(sx), piece.y.checked_add(sy)) else {
                continue;
            };
            if y < 0 {
                continue;
            }
            self.set(x, y, cell);
        }
    }

    /// Indices of every fully occupied row, top to bottom.
    pub fn scan_full_rows(&self) -> FullRows {
        (0..BOARD_HEIGHT as usize)
            .filter(|&y| self.is_row_full(y))
            .collect()
    }

    /// Remove the named rows and add as many empty rows at the top.
    ///
    /// The remaining rows keep their relative order. Out-of-range and duplicate
    /// indices are ignored, so the row count is always preserved.
    /// Returns the number of rows actually removed.
    pub fn clear_rows(&mut self, rows: &[usize]) -> usize {
        let height = BOARD_HEIGHT as usize;
        let width = BOARD_WIDTH as usize;

        let mut doomed = [false; MAX_ROWS];
        for &y in rows {
            if y < height {
                doomed[y] = true;
            }
        }

        // Two-pointer compaction from the bottom up.
        let mut write_y = height;
        for read_y in (0..height).rev() {
            if doomed[read_y] {
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                let src = read_y * width;
                self.cells.copy_within(src..src + width, write_y * width);
            }
        }

        self.cells[..write_y * width].fill(Cell::Empty);
        write_y
    }

    /// Number of occupied cells on the whole board.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_occupied()).count()
    }

    /// Set every cell empty
    pub fn reset(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Color, PieceKind};

    fn fill_row(board: &mut Board, y: i8) {
        for x in 0..BOARD_WIDTH as i8 {
            board.set(x, y, Cell::Occupied(Color::Blue));
        }
    }

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 19), Some(199));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 20), None);
    }

    #[test]
    fn test_clear_rows_zero_is_noop() {
        let mut board = Board::new();
        board.set(2, 19, Cell::Occupied(Color::Red));
        let before = board.clone();
        assert_eq!(board.clear_rows(&[]), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_clear_rows_order_does_not_matter() {
        let mut a = Board::new();
        for y in [10, 15, 19] {
            fill_row(&mut a, y);
        }
        a.set(4, 12, Cell::Occupied(Color::Green));
        a.set(7, 17, Cell::Occupied(Color::Cyan));
        let mut b = a.clone();

        assert_eq!(a.clear_rows(&[10, 15, 19]), 3);
        assert_eq!(b.clear_rows(&[19, 10, 15]), 3);
        assert_eq!(a, b);

        // Row 12 drops past row 15 and 19 -> 14; row 17 drops past 19 -> 18.
        assert_eq!(a.get(4, 14), Some(Cell::Occupied(Color::Green)));
        assert_eq!(a.get(7, 18), Some(Cell::Occupied(Color::Cyan)));
        assert_eq!(a.occupied_count(), 2);
    }

    #[test]
    fn test_clear_rows_ignores_duplicates_and_out_of_range() {
        let mut board = Board::new();
        fill_row(&mut board, 19);
        assert_eq!(board.clear_rows(&[19, 19, 42]), 1);
        assert_eq!(board.occupied_count(), 0);
        assert_eq!(board.rows().count(), BOARD_HEIGHT as usize);
    }

    #[test]
    fn test_clear_every_row() {
        let mut board = Board::new();
        for y in 0..BOARD_HEIGHT as i8 {
            fill_row(&mut board, y);
        }
        let full = board.scan_full_rows();
        assert_eq!(full.len(), BOARD_HEIGHT as usize);
        assert_eq!(board.clear_rows(&full), BOARD_HEIGHT as usize);
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_merge_ignores_cells_outside_coordinate_range() {
        let mut board = Board::new();
        board.merge(&ActivePiece::new(PieceKind::I, i8::MAX, i8::MAX));
        board.merge(&ActivePiece::new(PieceKind::I, i8::MIN, 5));
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn test_is_empty_bounds_and_occupancy() {
        let mut board = Board::new();
        board.set(2, 7, Cell::Occupied(Color::Orange));
        assert!(board.is_empty(0, 0));
        assert!(board.is_empty(9, 19));
        assert!(!board.is_empty(2, 7));
        assert!(!board.is_empty(-1, 0));
        assert!(!board.is_empty(10, 0));
        assert!(!board.is_empty(0, 20));
        assert!(!board.is_empty(0, -1));
    }
}
