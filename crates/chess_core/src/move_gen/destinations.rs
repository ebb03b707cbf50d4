//! Move destinations for UI highlighting
//!
//! Attack sets are not move sets for pawns (they push straight, capture
//! diagonally) or kings (castling). This module adds those cases on top of
//! [`reachable_squares`] so the board can highlight where a selected piece
//! may go. Still pseudo-legal: pins and checks are not resolved.

use super::attack::reachable_squares;
use super::pawn::{pawn_attacks, pawn_start_rank};
use crate::position::Position;
use crate::types::{Color, Piece, Square};

/// Pseudo-legal destinations for the piece standing on `from`
///
/// Returns an empty list when `from` is empty.
///
/// - Pawns: single push, double push from the start rank over two empty
///   squares, diagonal captures onto enemy pieces or the en-passant square
/// - Kings: adjacent reachable squares plus castling targets when the right
///   is held and every square between king and rook is empty
/// - Others: [`reachable_squares`]
pub fn destination_squares(from: Square, position: &Position) -> Vec<Square> {
    let Some(piece) = position.piece_at(from) else {
        return Vec::new();
    };

    match piece {
        Piece::Pawn(color) => pawn_destinations(from, color, position),
        Piece::King(color) => {
            let mut squares = reachable_squares(from, piece, position);
            squares.extend(castling_destinations(from, color, position));
            squares
        }
        Piece::Knight(_) | Piece::Bishop(_) | Piece::Rook(_) | Piece::Queen(_) => {
            reachable_squares(from, piece, position)
        }
    }
}

fn pawn_destinations(from: Square, color: Color, position: &Position) -> Vec<Square> {
    let mut squares = Vec::with_capacity(4);
    let dr = color.forward();

    if let Some(one) = from.offset(0, dr).filter(|sq| position.is_empty(*sq)) {
        squares.push(one);
        if from.rank_index() == pawn_start_rank(color) {
            if let Some(two) = one.offset(0, dr).filter(|sq| position.is_empty(*sq)) {
                squares.push(two);
            }
        }
    }

    for target in pawn_attacks(from, color) {
        let enemy = position
            .piece_at(target)
            .is_some_and(|p| p.color() != color);
        if enemy || position.en_passant == Some(target) {
            squares.push(target);
        }
    }

    squares
}

fn castling_destinations(from: Square, color: Color, position: &Position) -> Vec<Square> {
    let home_rank = match color {
        Color::White => 0,
        Color::Black => 7,
    };
    let Some(home) = Square::from_indices(4, home_rank) else {
        return Vec::new();
    };
    if from != home {
        return Vec::new();
    }

    let path_clear = |files: &[i8]| {
        files.iter().all(|&f| {
            Square::from_indices(f, home_rank).is_some_and(|sq| position.is_empty(sq))
        })
    };

    let mut squares = Vec::new();
    if position.castling.kingside(color) && path_clear(&[5, 6]) {
        squares.extend(Square::from_indices(6, home_rank));
    }
    if position.castling.queenside(color) && path_clear(&[1, 2, 3]) {
        squares.extend(Square::from_indices(2, home_rank));
    }
    squares
}
