//! Position aggregate
//!
//! A [`Position`] is a plain value: board contents, side to move, castling
//! rights, en-passant target and the two move counters. Nothing in this crate
//! mutates a position after it is built; geometry and detectors borrow it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::STARTING_FEN;
use crate::types::{Color, Piece, Square};

/// Castling availability for both sides
///
/// Plain data holder. Nothing here checks that rights only ever decrease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl Default for CastlingRights {
    /// All four rights available, as at the start of a game
    fn default() -> Self {
        Self {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }
}

impl CastlingRights {
    /// No rights for either side
    pub fn none() -> Self {
        Self {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }

    /// Kingside right for `color`
    pub fn kingside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_kingside,
            Color::Black => self.black_kingside,
        }
    }

    /// Queenside right for `color`
    pub fn queenside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_queenside,
            Color::Black => self.black_queenside,
        }
    }

    /// True when no right is left
    pub fn is_empty(&self) -> bool {
        !(self.white_kingside || self.white_queenside || self.black_kingside || self.black_queenside)
    }
}

/// Complete chess position
///
/// # Fields
///
/// - `board`: occupied squares only, at most one piece per square
/// - `side_to_move`: color whose turn it is
/// - `castling`: the four castling flags
/// - `en_passant`: target square behind a pawn that just advanced two ranks
/// - `halfmove_clock` / `fullmove_number`: counters, kept verbatim
///
/// The model does not enforce "exactly one king per side". Use
/// [`Position::king_square`], which returns an `Option`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub board: BTreeMap<Square, Piece>,
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Default for Position {
    fn default() -> Self {
        Self::starting()
    }
}

impl Position {
    /// Board with no pieces, White to move, no castling rights
    pub fn empty() -> Self {
        Self {
            board: BTreeMap::new(),
            side_to_move: Color::White,
            castling: CastlingRights::none(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Standard initial position
    pub fn starting() -> Self {
        // The starting text always has all six fields
        Self::from_fen(STARTING_FEN).unwrap_or_else(|_| Self::empty())
    }

    /// Builder used mostly by tests: returns a copy with `piece` on `square`
    pub fn with_piece(mut self, square: Square, piece: Piece) -> Self {
        self.board.insert(square, piece);
        self
    }

    /// Builder: returns a copy with a different side to move
    pub fn with_side_to_move(mut self, color: Color) -> Self {
        self.side_to_move = color;
        self
    }

    /// Piece on `square`, if any
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.get(&square).copied()
    }

    /// True when `square` holds no piece
    #[inline]
    pub fn is_empty(&self, square: Square) -> bool {
        !self.board.contains_key(&square)
    }

    /// All pieces, in rank-major square order
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.board.iter().map(|(sq, piece)| (*sq, *piece))
    }

    /// Pieces belonging to `color`
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color() == color)
    }

    /// First king of `color` found, if any
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|(_, piece)| matches!(piece, Piece::King(_)))
            .map(|(sq, _)| sq)
    }

    /// Half-moves played so far, derived from the move counters
    pub fn plies_played(&self) -> usize {
        let full = self.fullmove_number.saturating_sub(1) as usize * 2;
        match self.side_to_move {
            Color::White => full,
            Color::Black => full + 1,
        }
    }
}
