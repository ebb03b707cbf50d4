//! Coordinate move notation
//!
//! Engines speak in coordinate moves: from-square, to-square and an optional
//! promotion letter (`e2e4`, `e7e8q`). [`MoveNotation`] is the seam the
//! analysis layer uses to turn such strings into domain moves and back;
//! [`CoordinateNotation`] is the stock implementation.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::move_gen::destination_squares;
use crate::position::Position;
use crate::types::{Piece, PieceKind, Square};

static COORDINATE_MOVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-h][1-8][a-h][1-8][qrbn]?$").expect("coordinate move pattern is valid")
});

/// True when `text` has the shape of a coordinate move
///
/// Shape only; says nothing about the position.
pub fn is_coordinate_move(text: &str) -> bool {
    COORDINATE_MOVE.is_match(text)
}

/// A move resolved against a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChessMove {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub promotion: Option<PieceKind>,
}

/// Translation between coordinate strings and [`ChessMove`]
pub trait MoveNotation: Send + Sync {
    /// Resolve `text` in `position`; `None` when it does not describe a
    /// plausible move there
    fn parse_coordinate(&self, text: &str, position: &Position) -> Option<ChessMove>;

    /// Inverse of [`MoveNotation::parse_coordinate`]
    fn to_coordinate(&self, mv: &ChessMove) -> String;
}

/// Coordinate notation checked against pseudo-legal destinations
///
/// A string is accepted when it matches the coordinate pattern, a piece of
/// the side to move stands on the from-square, and the to-square is one of
/// that piece's [`destination_squares`].
#[derive(Debug, Default, Clone, Copy)]
pub struct CoordinateNotation;

impl MoveNotation for CoordinateNotation {
    fn parse_coordinate(&self, text: &str, position: &Position) -> Option<ChessMove> {
        let text = text.trim();
        if !is_coordinate_move(text) {
            return None;
        }

        let from: Square = text.get(0..2)?.parse().ok()?;
        let to: Square = text.get(2..4)?.parse().ok()?;
        let promotion = text
            .chars()
            .nth(4)
            .and_then(PieceKind::from_promotion_char);

        let piece = position.piece_at(from)?;
        if piece.color() != position.side_to_move {
            return None;
        }
        if promotion.is_some() && !matches!(piece, Piece::Pawn(_)) {
            return None;
        }
        if !destination_squares(from, position).contains(&to) {
            return None;
        }

        Some(ChessMove {
            from,
            to,
            piece,
            captured: position.piece_at(to),
            promotion,
        })
    }

    fn to_coordinate(&self, mv: &ChessMove) -> String {
        let mut out = format!("{}{}", mv.from, mv.to);
        if let Some(c) = mv.promotion.and_then(PieceKind::promotion_char) {
            out.push(c);
        }
        out
    }
}
