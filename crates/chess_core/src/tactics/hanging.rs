//! Hanging piece detection
//!
//! A piece hangs when at least one enemy piece attacks it and no friendly
//! piece defends it. Kings are skipped: an attacked king is check, not a
//! material question.
//!
//! The count-based test is deliberately coarse. It does not run a static
//! exchange evaluation, so a queen attacked by a pawn but defended once is
//! not reported even though it is losing material.

use super::detector::PatternDetector;
use super::types::{describe_piece, PatternSeverity, PatternType, TacticalPattern};
use crate::constants::{CRITICAL_MATERIAL_THRESHOLD, HIGH_MATERIAL_THRESHOLD};
use crate::move_gen::attackers_of;
use crate::position::Position;
use crate::types::Piece;

/// Finds attacked, undefended pieces of both colors
#[derive(Debug, Default, Clone, Copy)]
pub struct HangingPieceDetector;

impl PatternDetector for HangingPieceDetector {
    fn name(&self) -> &'static str {
        "hanging"
    }

    fn supported_types(&self) -> &'static [PatternType] {
        &[PatternType::HangingPiece]
    }

    fn detect(&self, position: &Position) -> Vec<TacticalPattern> {
        let mut patterns = Vec::new();

        for (square, piece) in position.pieces() {
            if matches!(piece, Piece::King(_)) {
                continue;
            }

            let owner = piece.color();
            let attackers = attackers_of(square, owner.opposite(), position);
            if attackers.is_empty() {
                continue;
            }
            if !attackers_of(square, owner, position).is_empty() {
                continue;
            }

            let value = piece.value();
            let severity = if value >= CRITICAL_MATERIAL_THRESHOLD {
                PatternSeverity::Critical
            } else if value >= HIGH_MATERIAL_THRESHOLD {
                PatternSeverity::High
            } else {
                PatternSeverity::Medium
            };

            let mut squares: Vec<_> = attackers.iter().map(|(sq, _)| *sq).collect();
            squares.push(square);

            patterns.push(TacticalPattern {
                pattern_type: PatternType::HangingPiece,
                squares,
                description: format!(
                    "{} is undefended and attacked {} time{}",
                    describe_piece(square, piece),
                    attackers.len(),
                    if attackers.len() == 1 { "" } else { "s" }
                ),
                attackers,
                targets: vec![(square, piece)],
                primary_target: Some((square, piece)),
                side: owner.opposite(),
                value,
                severity,
                is_opportunity: position.side_to_move != owner,
            });
        }

        patterns
    }
}
