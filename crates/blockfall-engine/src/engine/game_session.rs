use serde::Serialize;
use tracing::{debug, info, trace};

use crate::{
    PieceSeed,
    core::Board,
    engine::{
        ActivePiece, ActivePieceSnapshot, GameField, GameOverSummary, GameStats, GravityClock,
        PieceBuffer, SessionEvent, SessionSnapshot,
    },
};

/// Lifecycle state of a [`GameSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
pub enum GameState {
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// One explicitly owned game: field, statistics, gravity, and state machine.
///
/// Commands return `true` if they were accepted and `false` if they were a
/// no-op, either because the session is in the wrong state or because the
/// move was blocked. Nothing here ever fails; the only abnormal outcome is
/// the transition to [`GameState::GameOver`].
///
/// Time enters only through [`Self::tick`]; the session has no clock of its own.
///
/// # Example
///
/// ```
/// use blockfall_engine::{GameSession, GameState};
///
/// let mut session = GameSession::new();
/// assert_eq!(session.state(), GameState::Menu);
///
/// assert!(session.start());
/// assert!(session.active_piece().is_some());
/// assert!(session.next_piece().is_some());
///
/// session.hard_drop();
/// assert!(session.score() > 0);
///
/// assert!(session.pause());
/// assert!(!session.rotate());
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    field: GameField,
    stats: GameStats,
    gravity: GravityClock,
    state: GameState,
    events: Vec<SessionEvent>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Creates a session in [`GameState::Menu`] with a randomly seeded piece stream.
    #[must_use]
    pub fn new() -> Self {
        Self::with_piece_buffer(PieceBuffer::new())
    }

    /// Like [`Self::new`], but the piece sequence is determined by `seed`.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_piece_buffer(PieceBuffer::with_seed(seed))
    }

    #[must_use]
    pub fn with_piece_buffer(piece_buffer: PieceBuffer) -> Self {
        Self {
            field: GameField::new(piece_buffer),
            stats: GameStats::new(),
            gravity: GravityClock::new(),
            state: GameState::Menu,
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        self.field.board()
    }

    #[must_use]
    pub fn active_piece(&self) -> Option<&ActivePiece> {
        self.field.falling_piece()
    }

    #[must_use]
    pub fn next_piece(&self) -> Option<&ActivePiece> {
        self.field.next_piece()
    }

    /// Landing row of the active piece, for drawing the ghost piece.
    #[must_use]
    pub fn ghost_y(&self) -> Option<i32> {
        self.field.ghost_y()
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.stats.level()
    }

    #[must_use]
    pub fn lines(&self) -> usize {
        self.stats.lines()
    }

    #[must_use]
    pub fn drop_interval_ms(&self) -> u64 {
        self.stats.drop_interval_ms()
    }

    /// Returns a read-only copy of everything a renderer needs.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            board: self.field.board().clone(),
            active_piece: self.active_piece().map(ActivePieceSnapshot::from),
            next_piece: self.next_piece().map(ActivePieceSnapshot::from),
            ghost_y: self.ghost_y(),
            score: self.score(),
            level: self.level(),
            lines: self.lines(),
            drop_interval_ms: self.drop_interval_ms(),
        }
    }

    /// Drains the events raised since the last call, oldest first.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Starts a new game from [`GameState::Menu`] or [`GameState::GameOver`].
    ///
    /// Events from the previous game that were not drained yet stay queued.
    pub fn start(&mut self) -> bool {
        if !matches!(self.state, GameState::Menu | GameState::GameOver) {
            return false;
        }
        self.clear();
        self.state = GameState::Playing;
        info!("game started");
        if self.field.spawn_next().is_err() {
            self.game_over();
        }
        true
    }

    pub fn pause(&mut self) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        self.state = GameState::Paused;
        debug!("game paused");
        true
    }

    pub fn resume(&mut self) -> bool {
        if !self.state.is_paused() {
            return false;
        }
        self.state = GameState::Playing;
        debug!("game resumed");
        true
    }

    /// Pauses a running game or resumes a paused one.
    pub fn toggle_pause(&mut self) -> bool {
        match self.state {
            GameState::Playing => self.pause(),
            GameState::Paused => self.resume(),
            GameState::Menu | GameState::GameOver => false,
        }
    }

    /// Discards the current game and returns to [`GameState::Menu`]. Accepted in every state.
    ///
    /// The event queue is left alone, like in [`Self::start`].
    pub fn reset(&mut self) -> bool {
        self.clear();
        self.state = GameState::Menu;
        info!("game reset");
        true
    }

    pub fn move_left(&mut self) -> bool {
        self.state.is_playing() && self.field.try_move(-1, 0).is_ok()
    }

    pub fn move_right(&mut self) -> bool {
        self.state.is_playing() && self.field.try_move(1, 0).is_ok()
    }

    pub fn rotate(&mut self) -> bool {
        self.state.is_playing() && self.field.try_rotate().is_ok()
    }

    /// Moves the active piece down one row, locking it if it cannot move.
    ///
    /// Soft drops score nothing.
    pub fn soft_drop(&mut self) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        self.step_down();
        true
    }

    /// Drops the active piece as far as it goes and locks it there.
    ///
    /// Each row fallen is worth [`HARD_DROP_POINTS_PER_CELL`](crate::HARD_DROP_POINTS_PER_CELL).
    pub fn hard_drop(&mut self) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        let rows = self.field.hard_drop();
        self.stats.add_hard_drop(rows);
        debug!(rows, "hard drop");
        self.lock_and_spawn();
        true
    }

    /// Advances the gravity clock by `elapsed_ms`.
    ///
    /// Outside [`GameState::Playing`] the time is ignored. Returns whether a
    /// gravity step was applied.
    pub fn tick(&mut self, elapsed_ms: u64) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        if !self.gravity.advance(elapsed_ms, self.stats.drop_interval_ms()) {
            return false;
        }
        trace!(interval_ms = self.stats.drop_interval_ms(), "gravity step");
        self.step_down();
        true
    }

    fn step_down(&mut self) {
        if self.field.try_move(0, 1).is_err() {
            self.lock_and_spawn();
        }
    }

    fn lock_and_spawn(&mut self) {
        let Some((piece, cleared_lines)) = self.field.lock_falling_piece() else {
            return;
        };
        self.events.push(SessionEvent::PieceLocked {
            kind: piece.kind(),
            cleared_lines,
        });
        if cleared_lines > 0 {
            debug!(cleared_lines, lines = self.stats.lines() + cleared_lines, "rows cleared");
        }

        if let Some(level) = self.stats.record_piece_lock(cleared_lines) {
            let drop_interval_ms = self.stats.drop_interval_ms();
            info!(level, drop_interval_ms, "level up");
            self.events.push(SessionEvent::LevelUp {
                level,
                drop_interval_ms,
            });
        }

        if self.field.spawn_next().is_err() {
            self.game_over();
        }
    }

    fn game_over(&mut self) {
        self.state = GameState::GameOver;
        let summary = GameOverSummary::new(self.score(), self.lines(), self.level());
        info!(
            score = summary.final_score,
            lines = summary.final_lines,
            level = summary.level,
            "game over"
        );
        self.events.push(SessionEvent::GameOver(summary));
    }

    fn clear(&mut self) {
        self.field.clear();
        self.stats = GameStats::new();
        self.gravity.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PieceColor, PieceKind};

    const GRAY: PieceColor = PieceColor::from_rgb(0x80_8080);

    fn scripted(kinds: &[PieceKind]) -> GameSession {
        let buffer = PieceBuffer::scripted(kinds.iter().copied(), PieceSeed::from_bytes([0; 16]));
        GameSession::with_piece_buffer(buffer)
    }

    fn started(kinds: &[PieceKind]) -> GameSession {
        let mut session = scripted(kinds);
        assert!(session.start());
        session
    }

    fn fill_row_except(session: &mut GameSession, y: i32, gap: std::ops::RangeInclusive<i32>) {
        for x in 0..10 {
            if !gap.contains(&x) {
                session.field.board_mut().set(x, y, Some(GRAY));
            }
        }
    }

    fn active_xy(session: &GameSession) -> (i32, i32) {
        let piece = session.active_piece().unwrap();
        (piece.x(), piece.y())
    }

    #[test]
    fn test_new_session_is_in_menu() {
        let session = scripted(&[]);
        assert!(session.state().is_menu());
        assert!(session.active_piece().is_none());
        assert!(session.next_piece().is_none());
        assert_eq!(session.score(), 0);
        assert_eq!(session.level(), 1);
        assert_eq!(session.drop_interval_ms(), 1000);
    }

    #[test]
    fn test_start_spawns_first_piece() {
        let session = started(&[PieceKind::I, PieceKind::T]);
        assert!(session.state().is_playing());
        assert_eq!(session.active_piece().map(ActivePiece::kind), Some(PieceKind::I));
        assert_eq!(session.next_piece().map(ActivePiece::kind), Some(PieceKind::T));
        assert_eq!(active_xy(&session), (3, 0));
        assert_eq!(session.ghost_y(), Some(19));
    }

    #[test]
    fn test_commands_outside_playing_are_noops() {
        let mut session = scripted(&[PieceKind::O]);
        assert!(!session.move_left());
        assert!(!session.move_right());
        assert!(!session.rotate());
        assert!(!session.soft_drop());
        assert!(!session.hard_drop());
        assert!(!session.tick(5000));
        assert!(!session.pause());
        assert!(!session.resume());
        assert!(!session.toggle_pause());
        assert!(session.state().is_menu());

        assert!(session.start());
        assert!(!session.start(), "start is only valid from Menu or GameOver");
        assert!(!session.resume());
    }

    #[test]
    fn test_pause_freezes_piece_and_gravity() {
        let mut session = started(&[PieceKind::O]);
        assert!(!session.tick(600));
        assert!(session.pause());
        let before = session.snapshot();

        assert!(!session.move_left());
        assert!(!session.rotate());
        assert!(!session.hard_drop());
        assert!(!session.tick(10_000));
        assert_eq!(session.snapshot(), before);

        assert!(session.resume());
        // Time accumulated before the pause is kept.
        assert!(session.tick(400));
        assert_eq!(active_xy(&session), (4, 1));
    }

    #[test]
    fn test_toggle_pause() {
        let mut session = started(&[PieceKind::O]);
        assert!(session.toggle_pause());
        assert!(session.state().is_paused());
        assert!(session.toggle_pause());
        assert!(session.state().is_playing());
    }

    #[test]
    fn test_moves_and_rotation() {
        let mut session = started(&[PieceKind::T]);
        assert!(session.move_left());
        assert_eq!(active_xy(&session), (3, 0));
        assert!(session.move_right());
        assert!(session.move_right());
        assert_eq!(active_xy(&session), (5, 0));

        assert!(session.rotate());
        let piece = session.active_piece().unwrap();
        assert_eq!(piece.shape().to_rows(), vec![vec![1, 0], vec![1, 1], vec![1, 0]]);
        assert_eq!((piece.x(), piece.y()), (5, 0));
        assert!(session.board().rows().flatten().all(Option::is_none));
    }

    #[test]
    fn test_blocked_move_is_rejected() {
        let mut session = started(&[PieceKind::O]);
        for _ in 0..4 {
            assert!(session.move_left());
        }
        assert!(!session.move_left());
        assert_eq!(active_xy(&session), (0, 0));
    }

    #[test]
    fn test_hard_drop_i_piece_on_empty_board() {
        let mut session = started(&[PieceKind::I, PieceKind::O]);
        assert!(session.hard_drop());

        for x in 0..10 {
            assert_eq!(session.board().is_occupied(x, 19), (3..=6).contains(&x));
        }
        assert_eq!(session.score(), 2 * 19);
        assert_eq!(session.lines(), 0);
        assert_eq!(session.active_piece().map(ActivePiece::kind), Some(PieceKind::O));
        assert_eq!(
            session.take_events(),
            vec![SessionEvent::PieceLocked {
                kind: PieceKind::I,
                cleared_lines: 0
            }]
        );
    }

    #[test]
    fn test_single_line_clear_scores_by_level() {
        let mut session = started(&[PieceKind::I, PieceKind::O]);
        fill_row_except(&mut session, 19, 3..=6);
        session.hard_drop();

        assert_eq!(session.lines(), 1);
        assert_eq!(session.score(), 2 * 19 + 40);
        assert!(session.board().rows().flatten().all(Option::is_none));
    }

    #[test]
    fn test_soft_drop_locks_when_blocked_and_scores_nothing() {
        let mut session = started(&[PieceKind::O, PieceKind::T]);
        for y in 1..=18 {
            assert!(session.soft_drop());
            assert_eq!(active_xy(&session), (4, y));
        }
        assert_eq!(session.ghost_y(), Some(18));

        assert!(session.soft_drop());
        assert_eq!(session.active_piece().map(ActivePiece::kind), Some(PieceKind::T));
        assert!(session.board().is_occupied(4, 19));
        assert!(session.board().is_occupied(5, 18));
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_gravity_steps_at_interval() {
        let mut session = started(&[PieceKind::O]);
        for _ in 0..62 {
            assert!(!session.tick(16));
        }
        assert_eq!(active_xy(&session), (4, 0));
        assert!(session.tick(16));
        assert_eq!(active_xy(&session), (4, 1));

        // A long stall still moves the piece a single row.
        assert!(session.tick(60_000));
        assert_eq!(active_xy(&session), (4, 2));
    }

    #[test]
    fn test_gravity_locks_resting_piece() {
        let mut session = started(&[PieceKind::O, PieceKind::S]);
        session.field.try_move(0, 18).unwrap();
        assert!(session.tick(1000));
        assert_eq!(session.active_piece().map(ActivePiece::kind), Some(PieceKind::S));
        assert!(session.board().is_occupied(4, 18));
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_level_up_speeds_up_gravity() {
        let mut kinds = vec![PieceKind::I; 12];
        kinds.push(PieceKind::O);
        let mut session = started(&kinds);

        // Ten single clears with the I piece filling columns 3..=6.
        for i in 0..10 {
            fill_row_except(&mut session, 19, 3..=6);
            session.hard_drop();
            assert_eq!(session.lines(), i + 1);
        }
        assert_eq!(session.level(), 2);
        assert_eq!(session.drop_interval_ms(), 950);

        let events = session.take_events();
        assert!(events.contains(&SessionEvent::LevelUp {
            level: 2,
            drop_interval_ms: 950
        }));

        // 19 rows of hard drop each time, and 40 points for each clear at level 1.
        assert_eq!(session.score(), 10 * (2 * 19 + 40));

        fill_row_except(&mut session, 19, 3..=6);
        session.hard_drop();
        assert_eq!(session.score(), 10 * (2 * 19 + 40) + 2 * 19 + 40 * 2);
    }

    #[test]
    fn test_spawn_collision_ends_game_without_board_change() {
        let mut session = started(&[PieceKind::I, PieceKind::T]);
        // Block one cell of the T spawn area; the I lands well away from it.
        session.field.board_mut().set(5, 1, Some(GRAY));
        session.move_left();
        session.move_left();
        session.move_left();
        let mut expected = session.board().clone();
        let template = PieceKind::I.template();
        expected.lock(&template.shape(), 0, 19, template.color());

        assert!(session.hard_drop());
        assert!(session.state().is_game_over());
        assert_eq!(session.active_piece().map(ActivePiece::kind), Some(PieceKind::T));
        assert_eq!(session.board(), &expected);

        let events = session.take_events();
        let Some(SessionEvent::GameOver(summary)) = events.last() else {
            panic!("expected game over event, got {events:?}");
        };
        assert_eq!(summary.final_score, session.score());
        assert_eq!(summary.final_lines, 0);
        assert!(!summary.celebrate);

        assert!(!session.hard_drop());
        assert!(!session.tick(1000));
        assert!(!session.pause());
    }

    #[test]
    fn test_start_after_game_over_begins_fresh() {
        let mut session = started(&[PieceKind::I, PieceKind::T]);
        session.field.board_mut().set(5, 1, Some(GRAY));
        session.move_left();
        session.move_left();
        session.move_left();
        session.hard_drop();
        assert!(session.state().is_game_over());

        assert!(session.start());
        assert!(session.state().is_playing());
        let events = session.take_events();
        assert!(
            matches!(events.last(), Some(SessionEvent::GameOver(_))),
            "undrained game over lost on restart: {events:?}"
        );
        assert_eq!(session.score(), 0);
        assert_eq!(session.lines(), 0);
        assert_eq!(session.level(), 1);
        assert_eq!(
            session.board().rows().flatten().filter(|c| c.is_some()).count(),
            0
        );
        assert!(session.active_piece().is_some());
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut session = started(&[PieceKind::I]);
        session.hard_drop();
        assert!(session.pause());

        assert!(session.reset());
        assert!(session.state().is_menu());
        assert!(session.active_piece().is_none());
        assert!(session.next_piece().is_none());
        assert_eq!(session.board(), &Board::EMPTY);
        assert_eq!(session.score(), 0);
        assert_eq!(
            session.take_events(),
            vec![SessionEvent::PieceLocked {
                kind: PieceKind::I,
                cleared_lines: 0,
            }]
        );

        assert!(session.reset());
        assert!(session.state().is_menu());
    }

    #[test]
    fn test_reset_discards_gravity_progress() {
        let mut session = started(&[PieceKind::O]);
        session.tick(900);
        session.reset();
        session.start();
        assert!(!session.tick(900));
        assert!(session.tick(100));
    }

    #[test]
    fn test_snapshot_reflects_session() {
        let mut session = started(&[PieceKind::L, PieceKind::J]);
        session.move_left();
        let snapshot = session.snapshot();

        assert_eq!(snapshot.state, GameState::Playing);
        let active = snapshot.active_piece.as_ref().unwrap();
        assert_eq!(active.kind, PieceKind::L);
        assert_eq!((active.x, active.y), (3, 0));
        assert_eq!(snapshot.next_piece.as_ref().map(|p| p.kind), Some(PieceKind::J));
        assert_eq!(snapshot.ghost_y, Some(18));
        assert_eq!(snapshot.level, 1);

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["state"], "Playing");
        assert_eq!(value["board"].as_array().unwrap().len(), 20);
        assert!(value["board"][19][0].is_null());
    }
}
