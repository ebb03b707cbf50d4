//! King geometry

use crate::constants::KING_OFFSETS;
use crate::types::Square;

/// Squares adjacent to `from`
pub(crate) fn king_attacks(from: Square) -> Vec<Square> {
    KING_OFFSETS
        .iter()
        .filter_map(|&(df, dr)| from.offset(df, dr))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_king_edge_and_center() {
        assert_eq!(king_attacks("e4".parse().unwrap()).len(), 8);
        assert_eq!(king_attacks("h8".parse().unwrap()).len(), 3);
        assert_eq!(king_attacks("d1".parse().unwrap()).len(), 5);
    }
}
