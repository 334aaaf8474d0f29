use serde::Serialize;

use super::{BOARD_HEIGHT, BOARD_WIDTH, piece::PieceColor, shape::Shape};

/// A single board cell: empty, or holding the color of a locked piece.
pub type Cell = Option<PieceColor>;

/// One row of the playfield.
pub type Row = [Cell; BOARD_WIDTH];

const EMPTY_ROW: Row = [None; BOARD_WIDTH];

/// The playfield: `BOARD_HEIGHT` rows of `BOARD_WIDTH` cells.
///
/// Row 0 is the top of the board and row indices grow downward. The
/// dimensions are fixed by the type, so every row always has exactly
/// `BOARD_WIDTH` cells.
///
/// Positions are given as signed `(x, y)` so that pieces may hang partly
/// above the board (negative `y`) and so that out-of-bounds placements can be
/// expressed and rejected.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, PieceKind};
///
/// let mut board = Board::EMPTY;
/// let template = PieceKind::O.template();
/// assert!(!board.is_blocked(&template.shape(), 0, 18));
///
/// board.lock(&template.shape(), 0, 18, template.color());
/// assert!(board.is_blocked(&template.shape(), 0, 18));
/// assert_eq!(board.clear_full_rows(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Board {
    rows: [Row; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Maps a signed board position to row/column indices, if inside the board.
fn cell_index(x: i32, y: i32) -> Option<(usize, usize)> {
    let x = usize::try_from(x).ok().filter(|&x| x < BOARD_WIDTH)?;
    let y = usize::try_from(y).ok().filter(|&y| y < BOARD_HEIGHT)?;
    Some((x, y))
}

/// Absolute board positions of the filled cells of `shape` anchored at `(origin_x, origin_y)`.
fn absolute_cells(
    shape: &Shape,
    origin_x: i32,
    origin_y: i32,
) -> impl Iterator<Item = (i32, i32)> + '_ {
    shape.filled_cells().map(move |(dx, dy)| {
        // Shapes are at most 4×4, so the offsets always fit.
        let dx = i32::try_from(dx).unwrap_or(i32::MAX);
        let dy = i32::try_from(dy).unwrap_or(i32::MAX);
        (origin_x.saturating_add(dx), origin_y.saturating_add(dy))
    })
}

impl Board {
    /// A board with every cell empty.
    pub const EMPTY: Self = Self {
        rows: [EMPTY_ROW; BOARD_HEIGHT],
    };

    /// Returns an empty board.
    #[must_use]
    pub const fn create_empty() -> Self {
        Self::EMPTY
    }

    /// Returns the cell at `(x, y)`, or `None` when outside the board.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        let (x, y) = cell_index(x, y)?;
        Some(self.rows[y][x])
    }

    /// Overwrites the cell at `(x, y)`. Returns `false` when outside the board.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match cell_index(x, y) {
            Some((x, y)) => {
                self.rows[y][x] = cell;
                true
            }
            None => false,
        }
    }

    /// Returns whether the cell at `(x, y)` is inside the board and filled.
    #[must_use]
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Returns whether every cell of row `y` is filled.
    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|row| row.iter().all(Option::is_some))
    }

    /// Returns whether `shape` anchored at `(origin_x, origin_y)` cannot be placed.
    ///
    /// A placement is blocked if any filled cell lands outside
    /// `[0, BOARD_WIDTH)` horizontally, at or below `BOARD_HEIGHT`, or on an
    /// occupied cell. Cells above the board (negative row) are never treated
    /// as occupied but are still checked against the side walls.
    #[must_use]
    pub fn is_blocked(&self, shape: &Shape, origin_x: i32, origin_y: i32) -> bool {
        absolute_cells(shape, origin_x, origin_y).any(|(x, y)| {
            if x < 0 || x >= Self::width_i32() || y >= Self::height_i32() {
                return true;
            }
            y >= 0 && self.is_occupied(x, y)
        })
    }

    /// Writes `color` into every filled cell of `shape` anchored at the origin.
    ///
    /// Cells that fall above the board are dropped. The caller is expected
    /// to have checked the placement with [`Self::is_blocked`].
    pub fn lock(&mut self, shape: &Shape, origin_x: i32, origin_y: i32, color: PieceColor) {
        for (x, y) in absolute_cells(shape, origin_x, origin_y) {
            if y >= 0 {
                self.set(x, y, Some(color));
            }
        }
    }

    /// Removes every full row and returns how many were removed.
    ///
    /// Rows are scanned from the bottom up. When a row is removed, everything
    /// above it shifts down by one and an empty row appears at the top; the
    /// same row index is then tested again, since a full row may have just
    /// moved into it.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = BOARD_HEIGHT;
        while y > 0 {
            let row = y - 1;
            if self.is_row_full(row) {
                self.rows.copy_within(0..row, 1);
                self.rows[0] = EMPTY_ROW;
                cleared += 1;
                continue;
            }
            y -= 1;
        }
        cleared
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        self.rows = [EMPTY_ROW; BOARD_HEIGHT];
    }

    #[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    const fn width_i32() -> i32 {
        BOARD_WIDTH as i32
    }

    #[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    const fn height_i32() -> i32 {
        BOARD_HEIGHT as i32
    }
}
