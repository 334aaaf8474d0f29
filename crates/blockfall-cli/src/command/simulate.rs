use std::path::PathBuf;

use blockfall_engine::{GameOverSummary, GameSession, PieceSeed, SessionEvent, SessionSnapshot};
use rand::{Rng as _, SeedableRng as _, rngs::StdRng};
use serde::Serialize;
use tracing::info;

use crate::{
    driver::{FrameDriver, LevelChange, Policy},
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Seed for the run (32 hex characters); random if omitted
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Simulated milliseconds per frame
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Give up on a game after this many frames
    #[arg(long, default_value_t = 1_000_000)]
    max_frames: u64,
    /// How the simulated player chooses its input (random, drop)
    #[arg(long, default_value_t = Policy::Random)]
    policy: Policy,
    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: usize,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    seed: PieceSeed,
    frame_ms: u64,
    policy: Policy,
    games: Vec<GameReport>,
}

#[derive(Debug, Serialize)]
struct GameReport {
    seed: PieceSeed,
    frames: u64,
    elapsed_ms: u64,
    gravity_steps: u64,
    completed_pieces: usize,
    line_cleared_counter: [usize; 5],
    level_changes: Vec<LevelChange>,
    /// `None` if the frame limit was hit first.
    game_over: Option<GameOverSummary>,
    final_state: SessionSnapshot,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        seed,
        frame_ms,
        max_frames,
        policy,
        games,
        output,
    } = arg;

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    info!(%seed, %policy, games, "starting simulation");

    let mut rng = rng_from_seed(seed);
    let games = (0..*games)
        .map(|game| {
            let report = simulate_game(rng.random(), *frame_ms, *max_frames, *policy, &mut rng);
            info!(
                game,
                score = report.final_state.score,
                lines = report.final_state.lines,
                level = report.final_state.level,
                frames = report.frames,
                "game finished"
            );
            report
        })
        .collect();

    let report = SimulationReport {
        seed,
        frame_ms: *frame_ms,
        policy: *policy,
        games,
    };
    util::save_json(&report, output.as_deref())
}

fn rng_from_seed(seed: PieceSeed) -> StdRng {
    let bytes = seed.to_bytes();
    let mut expanded = [0; 32];
    expanded[..16].copy_from_slice(&bytes);
    expanded[16..].copy_from_slice(&bytes);
    StdRng::from_seed(expanded)
}

fn simulate_game(
    seed: PieceSeed,
    frame_ms: u64,
    max_frames: u64,
    policy: Policy,
    rng: &mut StdRng,
) -> GameReport {
    let mut session = GameSession::with_seed(seed);
    session.start();

    let mut driver = FrameDriver::new(frame_ms);
    driver.run(&mut session, policy, rng, max_frames);

    let game_over = match driver.game_over() {
        Some(SessionEvent::GameOver(summary)) => Some(*summary),
        _ => None,
    };
    let stats = session.stats();
    GameReport {
        seed,
        frames: driver.frames(),
        elapsed_ms: driver.elapsed_ms(),
        gravity_steps: driver.gravity_steps(),
        completed_pieces: stats.completed_pieces(),
        line_cleared_counter: *stats.line_cleared_counter(),
        level_changes: driver.level_changes().to_vec(),
        game_over,
        final_state: session.snapshot(),
    }
}
