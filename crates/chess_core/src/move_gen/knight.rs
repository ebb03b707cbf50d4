//! Knight geometry
//!
//! Knights jump, so occupancy never shortens their attack set.

use crate::constants::KNIGHT_OFFSETS;
use crate::types::Square;

/// Squares a knight on `from` attacks
pub(crate) fn knight_attacks(from: Square) -> Vec<Square> {
    KNIGHT_OFFSETS
        .iter()
        .filter_map(|&(df, dr)| from.offset(df, dr))
        .collect()
}
