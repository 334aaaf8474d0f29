use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{ParsePieceSeedError, PieceKind, PieceTemplate, engine::ActivePiece};

/// Produces upcoming pieces and holds the one-slot "next" preview.
///
/// Every draw is an independent, uniform choice among the seven kinds.
/// There is no bag and no drought protection.
///
/// The next slot is filled lazily on the first draw, consumed by every
/// spawn, and refilled immediately afterwards, so once play has started a
/// preview is always available.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceBuffer, PieceKind};
///
/// let seed = "0".repeat(32).parse().unwrap();
/// let mut buffer = PieceBuffer::scripted([PieceKind::T, PieceKind::O], seed);
/// assert!(buffer.peek_next().is_none());
///
/// assert_eq!(buffer.pop_next().kind(), PieceKind::T);
/// assert_eq!(buffer.peek_next().map(|p| p.kind()), Some(PieceKind::O));
/// ```
#[derive(Debug, Clone)]
pub struct PieceBuffer {
    rng: Pcg32,
    scripted: VecDeque<PieceKind>,
    next: Option<ActivePiece>,
}

impl Default for PieceBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Seed for deterministic piece generation.
///
/// A 128-bit seed for the piece RNG. Two buffers built from the same seed
/// produce the same sequence of pieces, which makes simulations replayable.
///
/// Written as 32 hex characters, both by [`fmt::Display`] and in serialized form.
///
/// # Example
///
/// ```
/// use blockfall_engine::PieceSeed;
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
/// let parsed: PieceSeed = seed.to_string().parse().unwrap();
/// assert_eq!(parsed, seed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for PieceSeed {
    type Err = ParsePieceSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParsePieceSeedError::InvalidLength(s.len()));
        }
        let num = u128::from_str_radix(s, 16).map_err(ParsePieceSeedError::InvalidHex)?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

impl PieceBuffer {
    /// Creates a buffer seeded from the thread-local RNG.
    ///
    /// For a reproducible sequence, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::scripted(std::iter::empty(), seed)
    }

    /// Creates a buffer that yields `kinds` first, then continues with the seeded random stream.
    #[must_use]
    pub fn scripted<I>(kinds: I, seed: PieceSeed) -> Self
    where
        I: IntoIterator<Item = PieceKind>,
    {
        Self {
            rng: Pcg32::from_seed(seed.0),
            scripted: kinds.into_iter().collect(),
            next: None,
        }
    }

    fn draw(&mut self) -> ActivePiece {
        let template = match self.scripted.pop_front() {
            Some(kind) => kind.template(),
            None => PieceTemplate::random(&mut self.rng),
        };
        ActivePiece::spawn(template)
    }

    /// Takes the piece in the next slot (drawing one if it is empty) and refills the slot.
    pub fn pop_next(&mut self) -> ActivePiece {
        let piece = match self.next.take() {
            Some(piece) => piece,
            None => self.draw(),
        };
        self.next = Some(self.draw());
        piece
    }

    /// Returns the piece waiting in the next slot, if one has been drawn.
    #[must_use]
    pub fn peek_next(&self) -> Option<&ActivePiece> {
        self.next.as_ref()
    }

    /// Empties the next slot. The random stream itself is not rewound.
    pub fn clear_next(&mut self) {
        self.next = None;
    }
}
