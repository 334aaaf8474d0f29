//! Falling-block puzzle engine.
//!
//! The crate is split the same way the game is played:
//!
//! - [`core`] holds the static pieces of the puzzle: the [`Shape`] matrix,
//!   the seven [`PieceTemplate`]s and the [`Board`] with its collision and
//!   row-clearing primitives.
//! - [`engine`] holds everything that changes over time: the falling
//!   [`ActivePiece`], the [`GameField`] that moves it around, scoring in
//!   [`GameStats`], gravity timing in [`GravityClock`] and the
//!   [`GameSession`] state machine tying them together.
//!
//! The engine never schedules anything itself. A driver owns a
//! [`GameSession`], feeds it elapsed time through [`GameSession::tick`],
//! forwards player commands, and reads state back through queries or a
//! [`SessionSnapshot`].

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding with the board or walls")]
pub struct PieceCollisionError;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParsePieceSeedError {
    #[display("invalid seed: expected 32 hex characters, got {_0}")]
    InvalidLength(#[error(not(source))] usize),
    #[display("invalid seed: {_0}")]
    InvalidHex(std::num::ParseIntError),
}
