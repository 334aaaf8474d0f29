use blockfall_engine::{GameSession, SessionEvent};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

/// How the simulated player chooses its input each frame.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display, derive_more::FromStr,
)]
#[serde(rename_all = "lowercase")]
#[display(rename_all = "lowercase")]
pub(crate) enum Policy {
    /// Mash random moves, rotations and drops.
    #[default]
    Random,
    /// Hard-drop every piece the moment it spawns.
    Drop,
}

impl Policy {
    fn apply<R>(self, session: &mut GameSession, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        match self {
            Policy::Random => match rng.random_range(0..16) {
                0 | 1 => _ = session.move_left(),
                2 | 3 => _ = session.move_right(),
                4 | 5 => _ = session.rotate(),
                6 => _ = session.soft_drop(),
                7 => _ = session.hard_drop(),
                _ => {}
            },
            Policy::Drop => _ = session.hard_drop(),
        }
    }
}

/// A level change observed while driving a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct LevelChange {
    pub frame: u64,
    pub level: usize,
    pub drop_interval_ms: u64,
}

/// Drives a [`GameSession`] with a fixed frame step, the way a render loop would.
///
/// Each frame applies the player policy, then feeds `frame_ms` to
/// [`GameSession::tick`], then drains the session's events.
#[derive(Debug, Clone)]
pub(crate) struct FrameDriver {
    frame_ms: u64,
    frames: u64,
    gravity_steps: u64,
    level_changes: Vec<LevelChange>,
    game_over: Option<SessionEvent>,
}

impl FrameDriver {
    pub(crate) fn new(frame_ms: u64) -> Self {
        Self {
            frame_ms,
            frames: 0,
            gravity_steps: 0,
            level_changes: Vec::new(),
            game_over: None,
        }
    }

    pub(crate) fn frames(&self) -> u64 {
        self.frames
    }

    pub(crate) fn elapsed_ms(&self) -> u64 {
        self.frames.saturating_mul(self.frame_ms)
    }

    pub(crate) fn gravity_steps(&self) -> u64 {
        self.gravity_steps
    }

    pub(crate) fn level_changes(&self) -> &[LevelChange] {
        &self.level_changes
    }

    pub(crate) fn game_over(&self) -> Option<&SessionEvent> {
        self.game_over.as_ref()
    }

    /// Runs one frame.
    pub(crate) fn run_frame<R>(&mut self, session: &mut GameSession, policy: Policy, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        self.frames += 1;
        policy.apply(session, rng);
        if session.tick(self.frame_ms) {
            self.gravity_steps += 1;
        }
        for event in session.take_events() {
            self.observe(event);
        }
    }

    /// Runs frames until the game ends or `max_frames` have passed.
    pub(crate) fn run<R>(
        &mut self,
        session: &mut GameSession,
        policy: Policy,
        rng: &mut R,
        max_frames: u64,
    ) where
        R: Rng + ?Sized,
    {
        while session.state().is_playing() && self.frames < max_frames {
            self.run_frame(session, policy, rng);
        }
    }

    fn observe(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::PieceLocked {
                kind,
                cleared_lines,
            } => {
                debug!(frame = self.frames, ?kind, cleared_lines, "piece locked");
            }
            SessionEvent::LevelUp {
                level,
                drop_interval_ms,
            } => {
                info!(frame = self.frames, level, drop_interval_ms, "level up");
                self.level_changes.push(LevelChange {
                    frame: self.frames,
                    level,
                    drop_interval_ms,
                });
            }
            SessionEvent::GameOver(summary) => {
                if summary.celebrate {
                    info!(score = summary.final_score, "high score, celebrating");
                }
                self.game_over = Some(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{PieceBuffer, PieceKind, PieceSeed};
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;

    fn session(kinds: &[PieceKind]) -> GameSession {
        let seed = PieceSeed::from_bytes([9; 16]);
        let mut session =
            GameSession::with_piece_buffer(PieceBuffer::scripted(kinds.iter().copied(), seed));
        session.start();
        session
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("random".parse::<Policy>().unwrap(), Policy::Random);
        assert_eq!("Drop".parse::<Policy>().unwrap(), Policy::Drop);
        assert!("spin".parse::<Policy>().is_err());
        assert_eq!(Policy::Drop.to_string(), "drop");
        assert_eq!(Policy::default().to_string(), "random");
    }

    #[test]
    fn test_policy_display_matches_serde() {
        for policy in [Policy::Random, Policy::Drop] {
            let shown = policy.to_string();
            assert_eq!(serde_json::to_value(policy).unwrap(), shown.as_str());
            assert_eq!(shown.parse::<Policy>().unwrap(), policy);
        }
    }

    #[test]
    fn test_gravity_follows_frame_time() {
        let mut session = session(&[PieceKind::O]);
        let mut driver = FrameDriver::new(100);
        let mut rng = StdRng::seed_from_u64(1);

        // Only gravity moves the piece when no policy command is issued.
        for _ in 0..10 {
            driver.frames += 1;
            if session.tick(driver.frame_ms) {
                driver.gravity_steps += 1;
            }
        }
        assert_eq!(driver.gravity_steps(), 1);
        assert_eq!(session.active_piece().map(|p| p.y()), Some(1));

        driver.run_frame(&mut session, Policy::Drop, &mut rng);
        assert_eq!(driver.frames(), 11);
        assert_eq!(driver.elapsed_ms(), 1100);
    }

    #[test]
    fn test_drop_policy_ends_game() {
        let mut session = session(&[]);
        let mut driver = FrameDriver::new(16);
        let mut rng = StdRng::seed_from_u64(1);
        driver.run(&mut session, Policy::Drop, &mut rng, 10_000);

        assert!(session.state().is_game_over());
        assert!(driver.frames() < 100);
        let Some(SessionEvent::GameOver(summary)) = driver.game_over() else {
            panic!("expected game over");
        };
        assert_eq!(summary.final_score, session.score());
    }

    #[test]
    fn test_run_stops_at_frame_limit() {
        let mut session = session(&[]);
        let mut driver = FrameDriver::new(16);
        let mut rng = StdRng::seed_from_u64(2);
        driver.run(&mut session, Policy::Random, &mut rng, 5);
        assert_eq!(driver.frames(), 5);
    }
}
