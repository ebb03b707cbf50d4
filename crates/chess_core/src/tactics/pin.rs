//! Pin detection
//!
//! Only sliders pin. For every attack line of a bishop, rook or queen that
//! holds exactly two pieces, the nearer one is the pinned candidate and the
//! farther one the piece it shields. The pin stands when:
//!
//! 1. both pieces belong to the other side, and
//! 2. the shielded piece is worth protecting: king, queen or rook.
//!
//! A king behind makes the pin absolute (the pinned piece cannot legally
//! move). Three pieces in a row are not analysed as a chain; such lines are
//! skipped.

use super::detector::PatternDetector;
use super::types::{describe_piece, PatternSeverity, PatternType, TacticalPattern};
use crate::move_gen::attack_lines_from;
use crate::position::Position;
use crate::types::{Piece, Square};

/// Finds relative and absolute pins by sliding pieces
#[derive(Debug, Default, Clone, Copy)]
pub struct PinDetector;

impl PatternDetector for PinDetector {
    fn name(&self) -> &'static str {
        "pin"
    }

    fn supported_types(&self) -> &'static [PatternType] {
        &[PatternType::Pin, PatternType::AbsolutePin]
    }

    fn detect(&self, position: &Position) -> Vec<TacticalPattern> {
        let mut patterns = Vec::new();

        for (square, piece) in position.pieces().filter(|(_, p)| p.is_slider()) {
            for line in attack_lines_from(square, piece, position) {
                if let Some(pattern) = pin_on_line(square, piece, &line, position) {
                    patterns.push(pattern);
                }
            }
        }

        patterns
    }
}

fn is_valuable(piece: Piece) -> bool {
    matches!(piece, Piece::King(_) | Piece::Queen(_) | Piece::Rook(_))
}

fn pin_on_line(
    attacker_sq: Square,
    attacker: Piece,
    line: &[Square],
    position: &Position,
) -> Option<TacticalPattern> {
    let occupied: Vec<(Square, Piece)> = line
        .iter()
        .filter_map(|sq| position.piece_at(*sq).map(|p| (*sq, p)))
        .collect();
    let [(pinned_sq, pinned), (shielded_sq, shielded)] = occupied[..] else {
        return None;
    };

    let enemy = attacker.color().opposite();
    if pinned.color() != enemy || shielded.color() != enemy || !is_valuable(shielded) {
        return None;
    }

    let absolute = matches!(shielded, Piece::King(_));
    let (pattern_type, severity, value) = if absolute {
        (PatternType::AbsolutePin, PatternSeverity::Critical, pinned.value())
    } else {
        (
            PatternType::Pin,
            PatternSeverity::High,
            pinned.value().min(shielded.value() - pinned.value()),
        )
    };

    Some(TacticalPattern {
        pattern_type,
        squares: vec![attacker_sq, pinned_sq, shielded_sq],
        attackers: vec![(attacker_sq, attacker)],
        targets: vec![(pinned_sq, pinned), (shielded_sq, shielded)],
        primary_target: Some((pinned_sq, pinned)),
        side: attacker.color(),
        value,
        severity,
        is_opportunity: position.side_to_move == attacker.color(),
        description: format!(
            "{} pins {} to {}",
            describe_piece(attacker_sq, attacker),
            describe_piece(pinned_sq, pinned),
            describe_piece(shielded_sq, shielded)
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_rook_absolute_pin_against_king() {
        //! Rook e1, knight e4, king e8: one absolute pin
        let position: Position = "4k3/8/8/8/4n3/8/8/K3R3 w - - 0 1".parse().unwrap();
        let patterns = PinDetector.detect(&position);

        assert_eq!(patterns.len(), 1);
        let pin = &patterns[0];
        assert_eq!(pin.pattern_type, PatternType::AbsolutePin);
        assert_eq!(pin.severity, PatternSeverity::Critical);
        assert_eq!(pin.value, 300);
        assert_eq!(pin.primary_target, Some((sq("e4"), Piece::Knight(Color::Black))));
        assert_eq!(pin.squares, vec![sq("e1"), sq("e4"), sq("e8")]);
    }

    #[test]
    fn test_knight_behind_is_not_valuable() {
        let position: Position = "4n3/8/8/8/4n3/8/8/K3R2k w - - 0 1".parse().unwrap();
        assert!(PinDetector.detect(&position).is_empty());
    }

    #[test]
    fn test_relative_pin_against_queen() {
        //! Bishop pins a knight to the queen: value min(300, 900 - 300)
        let position: Position = "7k/8/5q2/8/3n4/8/1B6/K7 w - - 0 1".parse().unwrap();
        let patterns = PinDetector.detect(&position);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].pattern_type, PatternType::Pin);
        assert_eq!(patterns[0].severity, PatternSeverity::High);
        assert_eq!(patterns[0].value, 300);
    }

    #[test]
    fn test_friendly_piece_in_line_is_no_pin() {
        let position: Position = "4k3/8/8/8/4N3/8/8/K3R3 w - - 0 1".parse().unwrap();
        assert!(PinDetector.detect(&position).is_empty());
    }

    #[test]
    fn test_three_in_a_line_reports_front_pair_only() {
        //! Only the first two pieces on a ray are ever considered
        let position: Position = "4k3/4q3/8/8/4n3/8/8/K3R3 w - - 0 1".parse().unwrap();
        let patterns = PinDetector.detect(&position);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].pattern_type, PatternType::Pin);
        assert_eq!(patterns[0].targets[1].0, sq("e7"));
    }

    #[test]
    fn test_non_sliders_never_pin() {
        let position: Position = "4k3/8/8/8/4n3/8/4P3/K7 w - - 0 1".parse().unwrap();
        assert!(PinDetector.detect(&position).is_empty());
    }
}
