use serde::Serialize;

use crate::{
    PieceCollisionError,
    core::{BOARD_WIDTH, Board, PieceColor, PieceKind, PieceTemplate, Shape},
};

/// Offsets tried, in order, when a rotated shape collides at the current origin.
///
/// Left, right, up, up-left, up-right. This is a single shared table,
/// not a per-orientation rotation system.
pub const WALL_KICKS: [(i32, i32); 5] = [(-1, 0), (1, 0), (0, -1), (-1, -1), (1, -1)];

/// The falling, player-controlled piece.
///
/// An `ActivePiece` is a value: moving or rotating returns a new piece and
/// leaves the original untouched, so a rejected candidate is simply dropped.
///
/// # Example
///
/// ```
/// use blockfall_engine::{ActivePiece, Board, PieceKind};
///
/// let board = Board::EMPTY;
/// let piece = ActivePiece::spawn(PieceKind::I.template());
/// assert_eq!((piece.x(), piece.y()), (3, 0));
///
/// let moved = piece.moved(1, 0, &board).unwrap();
/// assert_eq!(moved.x(), 4);
/// assert_eq!(piece.drop_position(&board).y(), 19);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    kind: PieceKind,
    shape: Shape,
    color: PieceColor,
    x: i32,
    y: i32,
}

impl ActivePiece {
    /// Places a fresh copy of `template` at the top of the board, centered horizontally.
    ///
    /// No collision check is done here; the caller decides what a blocked
    /// spawn means.
    #[must_use]
    pub fn spawn(template: &PieceTemplate) -> Self {
        let shape = template.shape();
        let x = BOARD_WIDTH / 2 - shape.width() / 2;
        Self {
            kind: template.kind(),
            shape,
            color: template.color(),
            x: i32::try_from(x).unwrap_or_default(),
            y: 0,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub fn color(&self) -> PieceColor {
        self.color
    }

    /// Column of the top-left corner of the shape matrix.
    #[must_use]
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Row of the top-left corner of the shape matrix.
    #[must_use]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[must_use]
    pub fn is_blocked(&self, board: &Board) -> bool {
        board.is_blocked(&self.shape, self.x, self.y)
    }

    #[must_use]
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Returns the piece moved by `(dx, dy)`, or an error if that spot is blocked.
    pub fn moved(&self, dx: i32, dy: i32, board: &Board) -> Result<Self, PieceCollisionError> {
        let piece = self.shifted(dx, dy);
        if piece.is_blocked(board) {
            return Err(PieceCollisionError);
        }
        Ok(piece)
    }

    /// Returns the piece with its shape turned 90° clockwise, origin unchanged.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        Self {
            shape: self.shape.rotated_clockwise(),
            ..*self
        }
    }

    /// Rotates clockwise, falling back to [`WALL_KICKS`] if the rotated shape collides.
    ///
    /// The first offset giving a free placement wins. If none does, the
    /// rotation is rejected and the caller keeps the current piece.
    pub fn rotated_with_kicks(&self, board: &Board) -> Result<Self, PieceCollisionError> {
        let rotated = self.rotated_clockwise();
        if !rotated.is_blocked(board) {
            return Ok(rotated);
        }
        WALL_KICKS
            .iter()
            .map(|&(dx, dy)| rotated.shifted(dx, dy))
            .find(|piece| !piece.is_blocked(board))
            .ok_or(PieceCollisionError)
    }

    /// Returns where the piece would come to rest if dropped straight down.
    #[must_use]
    pub fn drop_position(&self, board: &Board) -> Self {
        let mut dropped = *self;
        while let Ok(piece) = dropped.moved(0, 1, board) {
            dropped = piece;
        }
        dropped
    }
}

/// Serializable view of a piece for collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivePieceSnapshot {
    pub kind: PieceKind,
    pub color: PieceColor,
    pub x: i32,
    pub y: i32,
    pub shape: Vec<Vec<u8>>,
}

impl From<&ActivePiece> for ActivePieceSnapshot {
    fn from(piece: &ActivePiece) -> Self {
        Self {
            kind: piece.kind,
            color: piece.color,
            x: piece.x,
            y: piece.y,
            shape: piece.shape.to_rows(),
        }
    }
}
