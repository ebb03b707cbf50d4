//! Tactical finding types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Color, Piece, Square};

/// Kind of tactical pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternType {
    /// Piece cannot move without exposing a more valuable piece behind it
    Pin,
    /// Piece cannot legally move because the king stands behind it
    AbsolutePin,
    KnightFork,
    PawnFork,
    /// Fork where one of the targets is a king
    RoyalFork,
    /// Any other piece attacking two or more enemy pieces
    DoubleAttack,
    /// Attacked and undefended
    HangingPiece,
}

impl PatternType {
    pub fn label(self) -> &'static str {
        match self {
            PatternType::Pin => "pin",
            PatternType::AbsolutePin => "absolute pin",
            PatternType::KnightFork => "knight fork",
            PatternType::PawnFork => "pawn fork",
            PatternType::RoyalFork => "royal fork",
            PatternType::DoubleAttack => "double attack",
            PatternType::HangingPiece => "hanging piece",
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How urgent a pattern is, ordered `Medium < High < Critical`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PatternSeverity {
    Medium,
    High,
    Critical,
}

/// One tactical finding
///
/// Built fresh by a detector pass and never mutated afterwards.
///
/// # Fields
///
/// - `squares`: every square involved (attackers first, then targets)
/// - `attackers` / `targets`: the pieces on either side of the pattern
/// - `primary_target`: the most valuable target
/// - `side`: the color that profits from the pattern
/// - `value`: signed material estimate in centipawns
/// - `is_opportunity`: `side` is the side to move and can act on it now
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TacticalPattern {
    pub pattern_type: PatternType,
    pub squares: Vec<Square>,
    pub attackers: Vec<(Square, Piece)>,
    pub targets: Vec<(Square, Piece)>,
    pub primary_target: Option<(Square, Piece)>,
    pub side: Color,
    pub value: i32,
    pub severity: PatternSeverity,
    pub is_opportunity: bool,
    pub description: String,
}

impl TacticalPattern {
    /// Target squares, in the order the detector found them
    pub fn target_squares(&self) -> Vec<Square> {
        self.targets.iter().map(|(sq, _)| *sq).collect()
    }
}

/// Most valuable entry of `targets`, first one wins ties
pub(crate) fn most_valuable(targets: &[(Square, Piece)]) -> Option<(Square, Piece)> {
    targets
        .iter()
        .copied()
        .fold(None, |best: Option<(Square, Piece)>, candidate| match best {
            Some(b) if b.1.value() >= candidate.1.value() => Some(b),
            _ => Some(candidate),
        })
}

/// "white knight on e4"
pub(crate) fn describe_piece(square: Square, piece: Piece) -> String {
    format!("{} on {}", piece, square)
}
