//! Pawn geometry
//!
//! A pawn's attack set is its two forward diagonals. Pushes are not attacks
//! and only appear in [`destination_squares`](super::destination_squares).

use crate::types::{Color, Square};

/// Diagonal-forward squares of a `color` pawn on `from`
pub(crate) fn pawn_attacks(from: Square, color: Color) -> Vec<Square> {
    let dr = color.forward();
    [-1, 1]
        .iter()
        .filter_map(|&df| from.offset(df, dr))
        .collect()
}

/// Rank index (0-based) pawns of `color` start on
pub(crate) fn pawn_start_rank(color: Color) -> i8 {
    match color {
        Color::White => 1,
        Color::Black => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(squares: Vec<Square>) -> Vec<String> {
        let mut out: Vec<String> = squares.iter().map(|s| s.to_string()).collect();
        out.sort();
        out
    }

    #[test]
    fn test_white_pawn_attacks_upward() {
        assert_eq!(names(pawn_attacks("e4".parse().unwrap(), Color::White)), vec!["d5", "f5"]);
    }

    #[test]
    fn test_black_pawn_attacks_downward() {
        assert_eq!(names(pawn_attacks("e5".parse().unwrap(), Color::Black)), vec!["d4", "f4"]);
    }

    #[test]
    fn test_edge_pawn_has_one_attack() {
        assert_eq!(names(pawn_attacks("a2".parse().unwrap(), Color::White)), vec!["b3"]);
        assert!(pawn_attacks("c8".parse().unwrap(), Color::White).is_empty());
    }
}
