//! # Core Value Types - Squares, Colors and Pieces
//!
//! ## Overview
//!
//! Everything the rest of the crate manipulates is built from three small
//! immutable value types:
//!
//! - [`Square`] - a file (`a`-`h`) and a rank (`1`-`8`)
//! - [`Color`] - `White` or `Black`
//! - [`Piece`] - one of the six piece kinds, each carrying its [`Color`]
//!
//! ## Square Validity
//!
//! A `Square` can only be built through [`Square::new`], [`Square::offset`]
//! or parsing, all of which return `None`/`Err` for coordinates off the board.
//! Code holding a `Square` never has to re-check bounds, which keeps ray walks
//! in the geometry layer free of index arithmetic:
//!
//! ```rust
//! use chess_core::Square;
//!
//! let h8 = Square::new('h', 8).unwrap();
//! assert!(h8.offset(1, 0).is_none()); // off the board, no square
//! assert_eq!(h8.offset(-1, -1).unwrap().to_string(), "g7");
//! ```
//!
//! ## Pieces as Tagged Variants
//!
//! `Piece` is an enum whose variants carry the owning color
//! (`Piece::Knight(Color::White)`). Consumers match exhaustively; the
//! payload-free [`PieceKind`] is used where only the kind matters
//! (promotions, kind comparisons).
//!
//! Letters follow the position-text convention: uppercase is White,
//! lowercase is Black (`N` = white knight, `q` = black queen).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    BISHOP_VALUE, KING_VALUE, KNIGHT_VALUE, PAWN_VALUE, QUEEN_VALUE, ROOK_VALUE,
};
use crate::error::ChessCoreError;

/// Side of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// The other side
    #[inline]
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank direction pawns of this color advance in (+1 for White)
    #[inline]
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Lower-case English name, used in pattern descriptions
    pub fn name(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A board square, always on the board
///
/// Internally stores zero-based file and rank indices. The derived ordering
/// sorts by rank first, then file (a1, b1, ..., h1, a2, ...), which gives
/// positions a deterministic iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Square {
    rank: u8,
    file: u8,
}

impl Square {
    /// Build a square from a file letter (`'a'..='h'`) and a rank (`1..=8`)
    pub fn new(file: char, rank: u8) -> Option<Square> {
        if !('a'..='h').contains(&file) || !(1..=8).contains(&rank) {
            return None;
        }
        Some(Square {
            file: file as u8 - b'a',
            rank: rank - 1,
        })
    }

    /// Build a square from zero-based indices (`0..8` each)
    pub fn from_indices(file: i8, rank: i8) -> Option<Square> {
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Square {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            None
        }
    }

    /// File letter, `'a'..='h'`
    #[inline]
    pub fn file(self) -> char {
        (b'a' + self.file) as char
    }

    /// Rank number, `1..=8`
    #[inline]
    pub fn rank(self) -> u8 {
        self.rank + 1
    }

    /// Zero-based file index
    #[inline]
    pub fn file_index(self) -> i8 {
        self.file as i8
    }

    /// Zero-based rank index
    #[inline]
    pub fn rank_index(self) -> i8 {
        self.rank as i8
    }

    /// Shift by `(d_file, d_rank)`; `None` when the result leaves the board
    #[inline]
    pub fn offset(self, d_file: i8, d_rank: i8) -> Option<Square> {
        Square::from_indices(self.file_index() + d_file, self.rank_index() + d_rank)
    }

    /// All 64 squares in rank-major order
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|rank| (0..8u8).map(move |file| Square { file, rank }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl FromStr for Square {
    type Err = ChessCoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let parsed = match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => rank
                .to_digit(10)
                .and_then(|rank| Square::new(file, rank as u8)),
            _ => None,
        };
        parsed.ok_or_else(|| ChessCoreError::InvalidSquare {
            text: s.to_string(),
        })
    }
}

impl From<Square> for String {
    fn from(square: Square) -> String {
        square.to_string()
    }
}

impl TryFrom<String> for Square {
    type Error = ChessCoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Piece kind without color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Lower-case English name
    pub fn name(self) -> &'static str {
        match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Rook => "rook",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        }
    }

    /// Promotion suffix letter used in coordinate notation
    pub fn promotion_char(self) -> Option<char> {
        match self {
            PieceKind::Queen => Some('q'),
            PieceKind::Rook => Some('r'),
            PieceKind::Bishop => Some('b'),
            PieceKind::Knight => Some('n'),
            PieceKind::Pawn | PieceKind::King => None,
        }
    }

    /// Inverse of [`PieceKind::promotion_char`]
    pub fn from_promotion_char(c: char) -> Option<PieceKind> {
        match c {
            'q' => Some(PieceKind::Queen),
            'r' => Some(PieceKind::Rook),
            'b' => Some(PieceKind::Bishop),
            'n' => Some(PieceKind::Knight),
            _ => None,
        }
    }

    /// Attach a color
    pub fn with_color(self, color: Color) -> Piece {
        match self {
            PieceKind::Pawn => Piece::Pawn(color),
            PieceKind::Knight => Piece::Knight(color),
            PieceKind::Bishop => Piece::Bishop(color),
            PieceKind::Rook => Piece::Rook(color),
            PieceKind::Queen => Piece::Queen(color),
            PieceKind::King => Piece::King(color),
        }
    }
}

/// A colored chess piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Piece {
    Pawn(Color),
    Knight(Color),
    Bishop(Color),
    Rook(Color),
    Queen(Color),
    King(Color),
}

impl Piece {
    /// Owning side
    #[inline]
    pub fn color(self) -> Color {
        match self {
            Piece::Pawn(c)
            | Piece::Knight(c)
            | Piece::Bishop(c)
            | Piece::Rook(c)
            | Piece::Queen(c)
            | Piece::King(c) => c,
        }
    }

    /// Kind without color
    #[inline]
    pub fn kind(self) -> PieceKind {
        match self {
            Piece::Pawn(_) => PieceKind::Pawn,
            Piece::Knight(_) => PieceKind::Knight,
            Piece::Bishop(_) => PieceKind::Bishop,
            Piece::Rook(_) => PieceKind::Rook,
            Piece::Queen(_) => PieceKind::Queen,
            Piece::King(_) => PieceKind::King,
        }
    }

    /// Material value in centipawns (pawn = 100)
    pub fn value(self) -> i32 {
        match self {
            Piece::Pawn(_) => PAWN_VALUE,
            Piece::Knight(_) => KNIGHT_VALUE,
            Piece::Bishop(_) => BISHOP_VALUE,
            Piece::Rook(_) => ROOK_VALUE,
            Piece::Queen(_) => QUEEN_VALUE,
            Piece::King(_) => KING_VALUE,
        }
    }

    /// Bishops, rooks and queens
    pub fn is_slider(self) -> bool {
        matches!(self, Piece::Bishop(_) | Piece::Rook(_) | Piece::Queen(_))
    }

    /// Decode a position-text letter (uppercase = White)
    pub fn from_fen_char(c: char) -> Option<Piece> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some(kind.with_color(color))
    }

    /// Encode as a position-text letter
    pub fn to_fen_char(self) -> char {
        let c = match self.kind() {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match self.color() {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color(), self.kind().name())
    }
}
