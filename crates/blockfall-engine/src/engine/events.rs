use serde::Serialize;

use crate::PieceKind;

/// Score above which a finished game earns the celebratory effect.
pub const CELEBRATION_SCORE_THRESHOLD: usize = 100;

/// Final results handed out when a game ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameOverSummary {
    pub final_score: usize,
    pub final_lines: usize,
    pub level: usize,
    /// Whether the final score is high enough for the celebration.
    pub celebrate: bool,
}

impl GameOverSummary {
    #[must_use]
    pub fn new(final_score: usize, final_lines: usize, level: usize) -> Self {
        Self {
            final_score,
            final_lines,
            level,
            celebrate: final_score > CELEBRATION_SCORE_THRESHOLD,
        }
    }
}

/// Something a presentation layer may want to react to.
///
/// Events are queued by [`GameSession`](crate::GameSession) as they happen
/// and drained with [`GameSession::take_events`](crate::GameSession::take_events).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A piece was locked into the board.
    PieceLocked {
        kind: PieceKind,
        cleared_lines: usize,
    },
    /// The level went up and gravity got faster.
    LevelUp { level: usize, drop_interval_ms: u64 },
    /// The newly spawned piece collided at its spawn position.
    GameOver(GameOverSummary),
}
