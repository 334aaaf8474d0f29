/// Base points for line clears, multiplied by the level at the time of the clear.
///
/// Index corresponds to number of lines cleared simultaneously:
/// - 0 lines: 0 points
/// - 1 line: 40 points
/// - 2 lines: 100 points
/// - 3 lines: 300 points
/// - 4 lines: 1200 points
pub const SCORE_TABLE: [usize; 5] = [0, 40, 100, 300, 1200];

/// Points awarded for each row a piece travels during a hard drop.
pub const HARD_DROP_POINTS_PER_CELL: usize = 2;

/// Cleared lines needed to advance one level.
pub const LINES_PER_LEVEL: usize = 10;

/// Gravity interval at level 1, in milliseconds.
pub const BASE_DROP_INTERVAL_MS: u64 = 1000;

/// How much faster gravity gets per level, in milliseconds.
pub const DROP_INTERVAL_STEP_MS: u64 = 50;

/// Gravity never gets faster than this, in milliseconds.
pub const MIN_DROP_INTERVAL_MS: u64 = 50;

/// Returns the gravity interval for `level`.
///
/// `max(50, 1000 - (level - 1) * 50)`: level 1 is 1000 ms, level 19 and
/// above bottom out at 50 ms.
///
/// # Example
///
/// ```
/// use blockfall_engine::drop_interval_for_level;
///
/// assert_eq!(drop_interval_for_level(1), 1000);
/// assert_eq!(drop_interval_for_level(2), 950);
/// assert_eq!(drop_interval_for_level(30), 50);
/// ```
#[must_use]
pub fn drop_interval_for_level(level: usize) -> u64 {
    let steps = u64::try_from(level.saturating_sub(1)).unwrap_or(u64::MAX);
    BASE_DROP_INTERVAL_MS
        .saturating_sub(steps.saturating_mul(DROP_INTERVAL_STEP_MS))
        .max(MIN_DROP_INTERVAL_MS)
}

/// Score, level, and line bookkeeping for one game.
///
/// - **Score**: line clears weighted by level, plus hard-drop distance
/// - **Level**: `lines / 10 + 1`, never decreasing within a game
/// - **Drop interval**: derived from the level, see [`drop_interval_for_level`]
/// - **Completed pieces**: total number of pieces locked
/// - **Line clear distribution**: count of locks by number of rows cleared
///
/// Soft drops score nothing, and a lock that clears no rows leaves
/// score, lines, and level unchanged.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.record_piece_lock(4);
///
/// assert_eq!(stats.score(), 1200);
/// assert_eq!(stats.lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: usize,
    level: usize,
    lines: usize,
    drop_interval_ms: u64,
    completed_pieces: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates statistics for a fresh game: score 0, level 1, 1000 ms gravity.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            lines: 0,
            drop_interval_ms: BASE_DROP_INTERVAL_MS,
            completed_pieces: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Returns the total number of lines cleared.
    #[must_use]
    pub const fn lines(&self) -> usize {
        self.lines
    }

    #[must_use]
    pub const fn drop_interval_ms(&self) -> u64 {
        self.drop_interval_ms
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Returns a histogram of locks by rows cleared.
    ///
    /// Index 0 counts locks that cleared nothing; index 4 counts four-row clears.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Adds the hard-drop bonus for a piece that fell `rows` rows.
    pub fn add_hard_drop(&mut self, rows: usize) {
        self.score += rows * HARD_DROP_POINTS_PER_CELL;
    }

    /// Updates statistics after a piece locks and `cleared_lines` rows are removed.
    ///
    /// Returns the new level if this lock crossed a level boundary.
    pub fn record_piece_lock(&mut self, cleared_lines: usize) -> Option<usize> {
        let index = cleared_lines.min(SCORE_TABLE.len() - 1);
        self.completed_pieces += 1;
        self.line_cleared_counter[index] += 1;
        if cleared_lines == 0 {
            return None;
        }

        // Score uses the level before this clear is counted.
        self.score += SCORE_TABLE[index] * self.level;
        self.lines += cleared_lines;

        let level = self.lines / LINES_PER_LEVEL + 1;
        if level == self.level {
            return None;
        }
        self.level = level;
        self.drop_interval_ms = drop_interval_for_level(level);
        Some(level)
    }
}
