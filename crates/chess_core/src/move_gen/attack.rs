//! Attack detection and square checking
//!
//! Per-piece attack sets and the queries built on them. These functions back
//! both the UI (which squares light up when a piece is selected) and the
//! tactical detectors (who attacks and who defends a square).
//!
//! ## Algorithm
//!
//! To find the attackers of a square we iterate through every piece of the
//! attacking color and test whether the square is in its attack set. With at
//! most 16 pieces per side this is cheap and keeps a single source of truth
//! for piece geometry.

use super::king::king_attacks;
use super::knight::knight_attacks;
use super::pawn::pawn_attacks;
use super::sliding::sliding_attacks;
use crate::position::Position;
use crate::types::{Color, Piece, Square};

/// Squares the piece on `from` geometrically attacks
///
/// Pseudo-attacks: squares holding friendly pieces are included (the piece
/// defends them), and legality of actually moving there is not considered.
///
/// # Arguments
///
/// * `from` - Square the piece stands on
/// * `piece` - The piece (its color decides pawn direction)
/// * `position` - Board used for slider blocking
///
/// # Examples
///
/// ```rust
/// use chess_core::{attacks_from, Color, Piece, Position};
///
/// let position = Position::empty();
/// let attacks = attacks_from("d4".parse().unwrap(), Piece::Rook(Color::White), &position);
/// assert_eq!(attacks.len(), 14);
/// ```
pub fn attacks_from(from: Square, piece: Piece, position: &Position) -> Vec<Square> {
    match piece {
        Piece::Pawn(color) => pawn_attacks(from, color),
        Piece::Knight(_) => knight_attacks(from),
        Piece::King(_) => king_attacks(from),
        Piece::Bishop(_) | Piece::Rook(_) | Piece::Queen(_) => {
            sliding_attacks(from, piece, position)
        }
    }
}

/// Attacked squares not occupied by a piece of the same color
pub fn reachable_squares(from: Square, piece: Piece, position: &Position) -> Vec<Square> {
    attacks_from(from, piece, position)
        .into_iter()
        .filter(|sq| {
            position
                .piece_at(*sq)
                .map_or(true, |other| other.color() != piece.color())
        })
        .collect()
}

/// Every piece of `by_color` whose attack set contains `target`
///
/// Used by the hanging-piece detector (attackers and defenders of a square)
/// and available to callers for square-safety display.
pub fn attackers_of(target: Square, by_color: Color, position: &Position) -> Vec<(Square, Piece)> {
    position
        .pieces_of(by_color)
        .filter(|(from, piece)| attacks_from(*from, *piece, position).contains(&target))
        .collect()
}

/// True when any piece of `by_color` attacks `square`
pub fn is_square_attacked(square: Square, by_color: Color, position: &Position) -> bool {
    position
        .pieces_of(by_color)
        .any(|(from, piece)| attacks_from(from, piece, position).contains(&square))
}

/// True when a king of `color` stands on an attacked square
///
/// Positions without a king of that color are never in check.
pub fn is_in_check(color: Color, position: &Position) -> bool {
    position
        .king_square(color)
        .is_some_and(|king| is_square_attacked(king, color.opposite(), position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn set(squares: Vec<Square>) -> BTreeSet<String> {
        squares.into_iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rook_d4_on_empty_board() {
        //! Rook on d4 attacks the whole d-file and 4th rank except d4 itself
        let position = Position::empty();
        let attacks = set(attacks_from(sq("d4"), Piece::Rook(Color::White), &position));

        let mut expected = BTreeSet::new();
        for rank in 1..=8u8 {
            if rank != 4 {
                expected.insert(format!("d{}", rank));
            }
        }
        for file in ['a', 'b', 'c', 'e', 'f', 'g', 'h'] {
            expected.insert(format!("{}4", file));
        }
        assert_eq!(attacks, expected);
    }

    #[test]
    fn test_bishop_ray_stops_after_first_piece() {
        let position = Position::empty()
            .with_piece(sq("e5"), Piece::Pawn(Color::Black))
            .with_piece(sq("b2"), Piece::Pawn(Color::White));
        let attacks = set(attacks_from(sq("c3"), Piece::Bishop(Color::White), &position));
        assert!(attacks.contains("d4"));
        assert!(attacks.contains("e5"));
        assert!(!attacks.contains("f6"));
        assert!(attacks.contains("b2"));
        assert!(!attacks.contains("a1"));
    }

    #[test]
    fn test_pawn_attacks_exclude_pushes() {
        let position = Position::starting();
        let attacks = set(attacks_from(sq("e2"), Piece::Pawn(Color::White), &position));
        assert_eq!(attacks, ["d3", "f3"].iter().map(|s| s.to_string()).collect());
    }

    #[test]
    fn test_reachable_excludes_friendly_pieces() {
        let position = Position::starting();
        let reachable = set(reachable_squares(sq("g1"), Piece::Knight(Color::White), &position));
        assert_eq!(reachable, ["f3", "h3"].iter().map(|s| s.to_string()).collect());
        assert!(reachable_squares(sq("a1"), Piece::Rook(Color::White), &position).is_empty());
    }

    #[test]
    fn test_attackers_of_square() {
        //! In the starting position f3 is covered by the g1 knight and two pawns
        let position = Position::starting();
        let attackers: BTreeSet<String> = attackers_of(sq("f3"), Color::White, &position)
            .into_iter()
            .map(|(s, _)| s.to_string())
            .collect();
        assert_eq!(
            attackers,
            ["e2", "g2", "g1"].iter().map(|s| s.to_string()).collect()
        );
        assert!(attackers_of(sq("f3"), Color::Black, &position).is_empty());
    }

    #[test]
    fn test_is_in_check() {
        let checked: Position = "4k3/8/8/8/8/8/8/4R1K1 b - - 0 1".parse().unwrap();
        assert!(is_in_check(Color::Black, &checked));
        assert!(!is_in_check(Color::White, &checked));
        assert!(!is_in_check(Color::White, &Position::empty()));
    }
}
