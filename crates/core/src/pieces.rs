//! Pieces module - the piece catalog and shape matrices
//!
//! Every kind has an N×N template (N ∈ {2, 3, 4}) and a color tag. Templates
//! are constants; rotating produces a new matrix and never touches them.

use crate::types::{Color, PieceKind};

/// Largest template edge (the I piece).
pub const MAX_SHAPE_SIZE: usize = 4;

/// Square binary matrix describing which cells of a piece are filled.
///
/// Stored inline with a fixed 4×4 capacity; only the top-left `size × size`
/// region is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    size: u8,
    rows: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    /// Build a shape from 0/1 rows. Panics (at compile time for constants) if
    /// the matrix is not square or larger than 4×4.
    pub const fn from_bits<const N: usize>(bits: [[u8; N]; N]) -> Self {
        assert!(N >= 1 && N <= MAX_SHAPE_SIZE);
        let mut rows = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut r = 0;
        while r < N {
            let mut c = 0;
            while c < N {
                rows[r][c] = bits[r][c] != 0;
                c += 1;
            }
            r += 1;
        }
        Self {
            size: N as u8,
            rows,
        }
    }

    /// Edge length N of the matrix.
    pub fn size(&self) -> usize {
        self.size as usize
    }

    /// Whether cell (row, col) is filled. Out-of-range reads are empty.
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        let n = self.size();
        row < n && col < n && self.rows[row][col]
    }

    /// Filled cells as `(sx, sy)` offsets from the anchor, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        let n = self.size();
        (0..n).flat_map(move |sy| {
            (0..n).filter_map(move |sx| {
                self.rows[sy][sx].then_some((sx as i8, sy as i8))
            })
        })
    }

    pub fn filled_count(&self) -> usize {
        self.cells().count()
    }

    /// Rotate 90° clockwise: transpose, then reverse each row.
    pub fn rotated_cw(&self) -> Self {
        let n = self.size();
        let mut rows = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (r, row) in rows.iter_mut().enumerate().take(n) {
            for (c, cell) in row.iter_mut().enumerate().take(n) {
                *cell = self.rows[n - 1 - c][r];
            }
        }
        Self {
            size: self.size,
            rows,
        }
    }
}

/// Immutable catalog entry for one piece kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub shape: Shape,
    pub color: Color,
}

const I_TEMPLATE: Template = Template {
    shape: Shape::from_bits([[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]]),
    color: Color::Cyan,
};

const J_TEMPLATE: Template = Template {
    shape: Shape::from_bits([[1, 0, 0], [1, 1, 1], [0, 0, 0]]),
    color: Color::Blue,
};

const L_TEMPLATE: Template = Template {
    shape: Shape::from_bits([[0, 0, 1], [1, 1, 1], [0, 0, 0]]),
    color: Color::Orange,
};

const O_TEMPLATE: Template = Template {
    shape: Shape::from_bits([[1, 1], [1, 1]]),
    color: Color::Yellow,
};

const S_TEMPLATE: Template = Template {
    shape: Shape::from_bits([[0, 1, 1], [1, 1, 0], [0, 0, 0]]),
    color: Color::Green,
};

const Z_TEMPLATE: Template = Template {
    shape: Shape::from_bits([[1, 1, 0], [0, 1, 1], [0, 0, 0]]),
    color: Color::Red,
};

const T_TEMPLATE: Template = Template {
    shape: Shape::from_bits([[0, 1, 0], [1, 1, 1], [0, 0, 0]]),
    color: Color::Purple,
};

/// Look up the unrotated template for a kind.
pub fn template_for(kind: PieceKind) -> Template {
    match kind {
        PieceKind::I => I_TEMPLATE,
        PieceKind::J => J_TEMPLATE,
        PieceKind::L => L_TEMPLATE,
        PieceKind::O => O_TEMPLATE,
        PieceKind::S => S_TEMPLATE,
        PieceKind::Z => Z_TEMPLATE,
        PieceKind::T => T_TEMPLATE,
    }
}
