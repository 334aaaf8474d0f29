use serde::Serialize;

use crate::{core::Board, engine::ActivePieceSnapshot};

use super::game_session::GameState;

/// Read-only copy of a [`GameSession`](crate::GameSession) at one instant.
///
/// This is what gets handed to renderers and written to reports. It owns
/// its data, so holding one never borrows the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub state: GameState,
    pub board: Board,
    pub active_piece: Option<ActivePieceSnapshot>,
    pub next_piece: Option<ActivePieceSnapshot>,
    /// Landing row of the active piece.
    pub ghost_y: Option<i32>,
    pub score: usize,
    pub level: usize,
    pub lines: usize,
    pub drop_interval_ms: u64,
}
