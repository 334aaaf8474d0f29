/// Turns elapsed time into gravity steps.
///
/// Elapsed milliseconds are accumulated; once the total reaches the current
/// drop interval a single step is due and the accumulator goes back to zero.
/// Any remainder is discarded, and one call never yields more than one step,
/// however large `elapsed_ms` is.
///
/// # Example
///
/// ```
/// use blockfall_engine::GravityClock;
///
/// let mut clock = GravityClock::new();
/// assert!(!clock.advance(600, 1000));
/// assert!(clock.advance(600, 1000));
/// assert_eq!(clock.accumulated_ms(), 0);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GravityClock {
    accumulated_ms: u64,
}

impl GravityClock {
    #[must_use]
    pub const fn new() -> Self {
        Self { accumulated_ms: 0 }
    }

    #[must_use]
    pub const fn accumulated_ms(&self) -> u64 {
        self.accumulated_ms
    }

    /// Adds `elapsed_ms` and returns whether a gravity step is due at `interval_ms`.
    pub fn advance(&mut self, elapsed_ms: u64, interval_ms: u64) -> bool {
        self.accumulated_ms = self.accumulated_ms.saturating_add(elapsed_ms);
        if self.accumulated_ms < interval_ms {
            return false;
        }
        self.accumulated_ms = 0;
        true
    }

    pub fn reset(&mut self) {
        self.accumulated_ms = 0;
    }
}
