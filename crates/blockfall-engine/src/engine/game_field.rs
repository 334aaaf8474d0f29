use tracing::debug;

use crate::{PieceCollisionError, core::Board};

use super::{active_piece::ActivePiece, piece_buffer::PieceBuffer};

/// The board together with the falling piece and the next-piece slot.
///
/// `GameField` enforces placement rules only: every accepted move or
/// rotation leaves the falling piece on free cells. Scoring and state
/// transitions belong to [`GameSession`](crate::GameSession).
#[derive(Debug, Clone)]
pub struct GameField {
    board: Board,
    falling_piece: Option<ActivePiece>,
    piece_buffer: PieceBuffer,
}

impl Default for GameField {
    fn default() -> Self {
        Self::new(PieceBuffer::new())
    }
}

impl GameField {
    /// Creates an empty field with no falling piece.
    #[must_use]
    pub fn new(piece_buffer: PieceBuffer) -> Self {
        Self {
            board: Board::EMPTY,
            falling_piece: None,
            piece_buffer,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> Option<&ActivePiece> {
        self.falling_piece.as_ref()
    }

    #[must_use]
    pub fn next_piece(&self) -> Option<&ActivePiece> {
        self.piece_buffer.peek_next()
    }

    /// Row where the falling piece would land, if there is one.
    #[must_use]
    pub fn ghost_y(&self) -> Option<i32> {
        self.falling_piece
            .map(|piece| piece.drop_position(&self.board).y())
    }

    /// Moves the falling piece by `(dx, dy)`.
    ///
    /// Fails without changing anything if the target is blocked or no piece
    /// is falling.
    pub fn try_move(&mut self, dx: i32, dy: i32) -> Result<(), PieceCollisionError> {
        let piece = self.falling_piece.ok_or(PieceCollisionError)?;
        self.falling_piece = Some(piece.moved(dx, dy, &self.board)?);
        Ok(())
    }

    /// Rotates the falling piece clockwise, applying wall kicks as needed.
    pub fn try_rotate(&mut self) -> Result<(), PieceCollisionError> {
        let piece = self.falling_piece.ok_or(PieceCollisionError)?;
        self.falling_piece = Some(piece.rotated_with_kicks(&self.board)?);
        Ok(())
    }

    /// Moves the falling piece down until it rests and returns how many rows it fell.
    ///
    /// The piece is not locked.
    pub fn hard_drop(&mut self) -> usize {
        let mut rows = 0;
        while self.try_move(0, 1).is_ok() {
            rows += 1;
        }
        rows
    }

    /// Locks the falling piece into the board and clears full rows.
    ///
    /// Returns the locked piece and the number of rows cleared, or `None` if
    /// nothing was falling.
    pub fn lock_falling_piece(&mut self) -> Option<(ActivePiece, usize)> {
        let piece = self.falling_piece.take()?;
        self.board
            .lock(piece.shape(), piece.x(), piece.y(), piece.color());
        let cleared = self.board.clear_full_rows();
        debug!(kind = ?piece.kind(), x = piece.x(), y = piece.y(), cleared, "piece locked");
        Some((piece, cleared))
    }

    /// Takes the next piece from the buffer and makes it the falling piece.
    ///
    /// The piece becomes the falling piece even when its spawn position is
    /// blocked; the error tells the caller the game cannot continue.
    pub fn spawn_next(&mut self) -> Result<(), PieceCollisionError> {
        let piece = self.piece_buffer.pop_next();
        self.falling_piece = Some(piece);
        debug!(kind = ?piece.kind(), next = ?self.next_piece().map(ActivePiece::kind), "piece spawned");
        if piece.is_blocked(&self.board) {
            return Err(PieceCollisionError);
        }
        Ok(())
    }

    /// Empties the board, the falling piece, and the next slot.
    pub fn clear(&mut self) {
        self.board.clear();
        self.falling_piece = None;
        self.piece_buffer.clear_next();
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }
}
