/// Largest extent of any shape along either axis.
pub const MAX_SHAPE_SIZE: usize = 4;

/// A small binary matrix describing which cells of a piece are filled.
///
/// Shapes are tight: the catalog never contains an all-empty row or column,
/// and rotation preserves that. Cells outside `width × height` are always empty.
///
/// Rotation produces a new matrix with swapped dimensions; the original is
/// left untouched, so a candidate can be tested and discarded freely.
///
/// # Example
///
/// ```
/// use blockfall_engine::Shape;
///
/// let bar = Shape::from_rows(&[&[1, 1, 1, 1]]);
/// let upright = bar.rotated_clockwise();
/// assert_eq!((upright.width(), upright.height()), (1, 4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    width: u8,
    height: u8,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    /// Builds a shape from rows of `0`/`1` values.
    ///
    /// # Panics
    ///
    /// Panics if the matrix is empty, larger than 4×4, or ragged.
    #[must_use]
    pub const fn from_rows(rows: &[&[u8]]) -> Self {
        let height = rows.len();
        assert!(height > 0 && height <= MAX_SHAPE_SIZE);
        let width = rows[0].len();
        assert!(width > 0 && width <= MAX_SHAPE_SIZE);

        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut y = 0;
        while y < height {
            assert!(rows[y].len() == width);
            let mut x = 0;
            while x < width {
                cells[y][x] = rows[y][x] != 0;
                x += 1;
            }
            y += 1;
        }

        #[expect(clippy::cast_possible_truncation)]
        let (width, height) = (width as u8, height as u8);
        Self {
            width,
            height,
            cells,
        }
    }

    /// Number of columns in the matrix.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width as usize
    }

    /// Number of rows in the matrix.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height as usize
    }

    /// Returns whether the cell at column `x`, row `y` is filled.
    ///
    /// Positions outside the matrix are reported as empty.
    #[must_use]
    pub const fn is_filled(&self, x: usize, y: usize) -> bool {
        x < self.width() && y < self.height() && self.cells[y][x]
    }

    /// Iterates over the `(x, y)` offsets of filled cells, row by row.
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height()).flat_map(move |y| {
            (0..self.width()).filter_map(move |x| self.cells[y][x].then_some((x, y)))
        })
    }

    /// Returns the matrix rows as `0`/`1` vectors, for snapshots.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..self.height())
            .map(|y| {
                (0..self.width())
                    .map(|x| u8::from(self.cells[y][x]))
                    .collect()
            })
            .collect()
    }

    /// Rotates the matrix 90° clockwise.
    ///
    /// Implemented as transpose-and-reverse: for the rotated matrix,
    /// `new[i][j] = old[rows - 1 - j][i]`, so a `rows × cols` matrix becomes
    /// `cols × rows`.
    #[must_use]
    pub const fn rotated_clockwise(&self) -> Self {
        let rows = self.height as usize;
        let cols = self.width as usize;
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut i = 0;
        while i < cols {
            let mut j = 0;
            while j < rows {
                cells[i][j] = self.cells[rows - 1 - j][i];
                j += 1;
            }
            i += 1;
        }
        Self {
            width: self.height,
            height: self.width,
            cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: Shape = Shape::from_rows(&[&[0, 1, 0], &[1, 1, 1]]);

    #[test]
    fn test_from_rows_dimensions() {
        assert_eq!(T.width(), 3);
        assert_eq!(T.height(), 2);
        assert!(T.is_filled(1, 0));
        assert!(!T.is_filled(0, 0));
        assert!(!T.is_filled(3, 0), "outside the matrix is empty");
    }

    #[test]
    fn test_filled_cells_row_major() {
        let cells: Vec<_> = T.filled_cells().collect();
        assert_eq!(cells, vec![(1, 0), (0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn test_rotation_swaps_dimensions() {
        let rotated = T.rotated_clockwise();
        assert_eq!(rotated.width(), 2);
        assert_eq!(rotated.height(), 3);
        // T pointing right after one clockwise turn.
        assert_eq!(rotated.to_rows(), vec![vec![1, 0], vec![1, 1], vec![1, 0]]);
    }

    #[test]
    fn test_rotation_matches_transpose_and_reverse() {
        let l = Shape::from_rows(&[&[0, 0, 1], &[1, 1, 1]]);
        let rotated = l.rotated_clockwise();
        for i in 0..l.width() {
            for j in 0..l.height() {
                assert_eq!(
                    rotated.is_filled(j, i),
                    l.is_filled(i, l.height() - 1 - j),
                    "mismatch at new[{i}][{j}]"
                );
            }
        }
    }

    #[test]
    fn test_four_rotations_restore_shape() {
        let shapes = [
            T,
            Shape::from_rows(&[&[1, 1, 1, 1]]),
            Shape::from_rows(&[&[1, 1], &[1, 1]]),
            Shape::from_rows(&[&[0, 1, 1], &[1, 1, 0]]),
        ];
        for shape in shapes {
            let mut rotated = shape;
            for _ in 0..4 {
                rotated = rotated.rotated_clockwise();
            }
            assert_eq!(rotated, shape);
            assert_eq!(rotated.to_rows(), shape.to_rows());
        }
    }

    #[test]
    fn test_rotation_keeps_cell_count() {
        let mut shape = T;
        for _ in 0..4 {
            shape = shape.rotated_clockwise();
            assert_eq!(shape.filled_cells().count(), 4);
        }
    }
}
