//! Game engine logic and state management.
//!
//! This module builds the game on top of the [`core`](crate::core) data structures:
//!
//! - [`ActivePiece`] - The falling piece: movement, rotation with wall kicks, drop position
//! - [`GameField`] - Board, falling piece, and next-piece slot
//! - [`PieceBuffer`] - Uniform random piece generation with a one-piece preview
//! - [`PieceSeed`] - Seed for deterministic piece generation
//! - [`GameStats`] - Score, level, lines, and gravity interval
//! - [`GravityClock`] - Converts elapsed time into gravity steps
//! - [`GameSession`] - The state machine tying everything together
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`] (it starts in [`GameState::Menu`]) and call [`GameSession::start`]
//! 2. Feed elapsed time with [`GameSession::tick`] and player commands as they arrive
//! 3. When a piece cannot move down it locks, full rows clear, and the next piece spawns
//! 4. The game ends when a new piece collides at its spawn position
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{GameSession, PieceSeed, SessionEvent};
//!
//! let seed: PieceSeed = "0123456789abcdef0123456789abcdef".parse().unwrap();
//! let mut session = GameSession::with_seed(seed);
//! session.start();
//!
//! while session.state().is_playing() {
//!     session.hard_drop();
//! }
//!
//! let events = session.take_events();
//! assert!(matches!(events.last(), Some(SessionEvent::GameOver(_))));
//! ```

pub use self::{
    active_piece::*, events::*, game_field::*, game_session::*, game_stats::*, gravity::*,
    piece_buffer::*, snapshot::*,
};

mod active_piece;
mod events;
mod game_field;
mod game_session;
mod game_stats;
mod gravity;
mod piece_buffer;
mod snapshot;
