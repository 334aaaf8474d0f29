use std::fmt;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::shape::Shape;

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// J-piece.
    J = 5,
    /// L-piece.
    L = 6,
}

/// Uniform, independent selection over the seven kinds.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        match rng.random_range(0..=6) {
            0 => PieceKind::I,
            1 => PieceKind::O,
            2 => PieceKind::T,
            3 => PieceKind::S,
            4 => PieceKind::Z,
            5 => PieceKind::J,
            _ => PieceKind::L,
        }
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All kinds in catalog order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Returns the immutable template for this kind.
    #[must_use]
    pub fn template(self) -> &'static PieceTemplate {
        &PIECE_TEMPLATES[self as usize]
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('L'), Some(PieceKind::L));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            _ => None,
        }
    }
}

/// Display color of a piece, stored as 24-bit RGB.
///
/// Serialized as a `"#rrggbb"` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceColor(u32);

impl PieceColor {
    #[must_use]
    pub const fn from_rgb(rgb: u32) -> Self {
        assert!(rgb <= 0x00ff_ffff);
        Self(rgb)
    }
}

impl fmt::Display for PieceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl Serialize for PieceColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let hex = s.strip_prefix('#').ok_or_else(|| {
            serde::de::Error::custom(format!("expected format '#rrggbb', got '{s}'"))
        })?;
        if hex.len() != 6 {
            return Err(serde::de::Error::custom(format!(
                "invalid color: expected 6 hex digits, got '{hex}'"
            )));
        }
        let rgb = u32::from_str_radix(hex, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid color: {s} ({e})")))?;
        Ok(Self(rgb))
    }
}

/// An entry of the fixed piece catalog: shape matrix plus display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceTemplate {
    kind: PieceKind,
    shape: Shape,
    color: PieceColor,
}

impl PieceTemplate {
    /// Returns one of the seven templates, chosen uniformly at random.
    pub fn random<R>(rng: &mut R) -> &'static Self
    where
        R: Rng + ?Sized,
    {
        let kind: PieceKind = StandardUniform.sample(rng);
        kind.template()
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    #[must_use]
    pub const fn color(&self) -> PieceColor {
        self.color
    }
}

/// The catalog, indexed by `PieceKind as usize`.
static PIECE_TEMPLATES: [PieceTemplate; PieceKind::LEN] = {
    const fn t(kind: PieceKind, rows: &[&[u8]], rgb: u32) -> PieceTemplate {
        PieceTemplate {
            kind,
            shape: Shape::from_rows(rows),
            color: PieceColor::from_rgb(rgb),
        }
    }
    [
        t(PieceKind::I, &[&[1, 1, 1, 1]], 0x00f5ff),
        t(PieceKind::O, &[&[1, 1], &[1, 1]], 0xffff00),
        t(PieceKind::T, &[&[0, 1, 0], &[1, 1, 1]], 0xa000f0),
        t(PieceKind::S, &[&[0, 1, 1], &[1, 1, 0]], 0x00f000),
        t(PieceKind::Z, &[&[1, 1, 0], &[0, 1, 1]], 0xf00000),
        t(PieceKind::J, &[&[1, 0, 0], &[1, 1, 1]], 0x0000f0),
        t(PieceKind::L, &[&[0, 0, 1], &[1, 1, 1]], 0xff7f00),
    ]
};
