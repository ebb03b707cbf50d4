//! Fork detection
//!
//! A fork is one piece attacking two or more enemy pieces at once. The
//! attacker's kind decides the label:
//!
//! | Attacker / targets         | Pattern        |
//! |----------------------------|----------------|
//! | knight                     | `KnightFork`   |
//! | pawn, exactly two targets  | `PawnFork`     |
//! | any target is a king       | `RoyalFork`    |
//! | anything else              | `DoubleAttack` |
//!
//! A pawn never forks three pieces (it only has two attack squares), and a
//! pawn attacking a single piece is not a fork at all.
//!
//! Value is the sum of the targets minus the attacker, i.e. what is left if
//! the forking piece is recaptured after winning one target.

use super::detector::PatternDetector;
use super::types::{describe_piece, most_valuable, PatternSeverity, PatternType, TacticalPattern};
use crate::constants::HIGH_FORK_THRESHOLD;
use crate::move_gen::attacks_from;
use crate::position::Position;
use crate::types::{Piece, Square};

/// Finds pieces attacking two or more enemy pieces
#[derive(Debug, Default, Clone, Copy)]
pub struct ForkDetector;

impl PatternDetector for ForkDetector {
    fn name(&self) -> &'static str {
        "fork"
    }

    fn supported_types(&self) -> &'static [PatternType] {
        &[
            PatternType::KnightFork,
            PatternType::PawnFork,
            PatternType::RoyalFork,
            PatternType::DoubleAttack,
        ]
    }

    fn detect(&self, position: &Position) -> Vec<TacticalPattern> {
        position
            .pieces()
            .filter_map(|(square, piece)| fork_from(square, piece, position))
            .collect()
    }
}

fn fork_from(square: Square, piece: Piece, position: &Position) -> Option<TacticalPattern> {
    let color = piece.color();
    let targets: Vec<(Square, Piece)> = attacks_from(square, piece, position)
        .into_iter()
        .filter_map(|target| {
            position
                .piece_at(target)
                .filter(|other| other.color() != color)
                .map(|other| (target, other))
        })
        .collect();

    if targets.len() < 2 {
        return None;
    }
    if matches!(piece, Piece::Pawn(_)) && targets.len() != 2 {
        return None;
    }

    let hits_king = targets.iter().any(|(_, t)| matches!(t, Piece::King(_)));
    let pattern_type = match piece {
        Piece::Knight(_) => PatternType::KnightFork,
        Piece::Pawn(_) => PatternType::PawnFork,
        _ if hits_king => PatternType::RoyalFork,
        _ => PatternType::DoubleAttack,
    };

    let value = targets.iter().map(|(_, t)| t.value()).sum::<i32>() - piece.value();
    let severity = if pattern_type == PatternType::RoyalFork {
        PatternSeverity::Critical
    } else if value > HIGH_FORK_THRESHOLD {
        PatternSeverity::High
    } else {
        PatternSeverity::Medium
    };

    let mut squares = vec![square];
    squares.extend(targets.iter().map(|(sq, _)| *sq));

    let target_text: Vec<String> = targets
        .iter()
        .map(|(sq, t)| describe_piece(*sq, *t))
        .collect();

    Some(TacticalPattern {
        pattern_type,
        squares,
        attackers: vec![(square, piece)],
        primary_target: most_valuable(&targets),
        description: format!(
            "{} {} {}",
            describe_piece(square, piece),
            if pattern_type == PatternType::DoubleAttack {
                "double-attacks"
            } else {
                "forks"
            },
            target_text.join(" and ")
        ),
        targets,
        side: color,
        value,
        severity,
        is_opportunity: position.side_to_move == color,
    })
}
