//! Sliding piece geometry
//!
//! Common functionality for sliding pieces (bishops, rooks, queens).
//! These pieces travel along a ray until the board edge or the first piece.
//!
//! ## Algorithm
//!
//! For each direction vector of the piece:
//! 1. Step one square at a time with [`Square::offset`]
//! 2. Empty square: include it and keep going
//! 3. Occupied square (either color): include it, then stop
//!
//! Friendly blockers are still included because this is an attack set: the
//! slider defends that piece. Filtering own pieces out is the job of
//! [`reachable_squares`](super::reachable_squares).
//!
//! ## Attack Lines
//!
//! [`attack_lines_from`] continues one step further than the ray walk: from the
//! first piece hit it scans on to the next occupied square. The pair
//! (first, second) is the raw material for pin and skewer detection.

use crate::constants::{ALL_DIRECTIONS, DIAGONAL_DIRECTIONS, ORTHOGONAL_DIRECTIONS};
use crate::position::Position;
use crate::types::{Piece, Square};

/// Direction set of a slider; empty for every other piece
pub(crate) fn slider_directions(piece: Piece) -> &'static [(i8, i8)] {
    match piece {
        Piece::Bishop(_) => &DIAGONAL_DIRECTIONS,
        Piece::Rook(_) => &ORTHOGONAL_DIRECTIONS,
        Piece::Queen(_) => &ALL_DIRECTIONS,
        Piece::Pawn(_) | Piece::Knight(_) | Piece::King(_) => &[],
    }
}

/// Walk every ray of `piece` from `from`, stopping after the first occupied square
pub(crate) fn sliding_attacks(from: Square, piece: Piece, position: &Position) -> Vec<Square> {
    let mut squares = Vec::with_capacity(27);

    for &(df, dr) in slider_directions(piece) {
        let mut current = from.offset(df, dr);
        while let Some(square) = current {
            squares.push(square);
            if !position.is_empty(square) {
                break;
            }
            current = square.offset(df, dr);
        }
    }

    squares
}

/// Attack lines of a sliding piece, one per direction that hits a piece
///
/// Each line holds the first occupied square along the ray and, if another
/// piece stands further along the same ray, that second square. Empty
/// squares are never part of a line. A ray that meets no piece produces no
/// line. Non-sliding pieces have no lines.
///
/// # Examples
///
/// ```rust
/// use chess_core::{attack_lines_from, Color, Piece, Position};
///
/// let position: Position = "4k3/8/8/4n3/8/8/8/4R2K w - - 0 1".parse().unwrap();
/// let lines = attack_lines_from("e1".parse().unwrap(), Piece::Rook(Color::White), &position);
/// assert_eq!(lines.len(), 2); // north: e5, e8; east: h1
/// ```
pub fn attack_lines_from(from: Square, piece: Piece, position: &Position) -> Vec<Vec<Square>> {
    let mut lines = Vec::new();

    for &(df, dr) in slider_directions(piece) {
        let mut current = from.offset(df, dr);
        let mut line: Vec<Square> = Vec::with_capacity(2);

        while let Some(square) = current {
            if !position.is_empty(square) {
                line.push(square);
                if line.len() == 2 {
                    break;
                }
            }
            current = square.offset(df, dr);
        }

        if !line.is_empty() {
            lines.push(line);
        }
    }

    lines
}
