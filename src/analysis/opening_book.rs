//! Opening-book lookup
//!
//! The analysis service asks an [`OpeningBook`] before waking the engine for
//! early positions. [`BuiltinOpeningBook`] carries the main lines of the
//! common openings as weighted candidate replies, keyed by the board, side
//! to move and castling fields of the position text. The en-passant field
//! and the counters are ignored, so transpositions share an entry and
//! writers that omit the en-passant square after a double push still match.
//!
//! # Selection
//!
//! - skill 15 and above: always the highest-weight reply
//! - below 15: a weighted random pick, so weaker opponents vary their openings

use std::collections::HashMap;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Skill level from which book choices become deterministic
pub const BEST_REPLY_SKILL: u8 = 15;

/// Book of candidate replies per position
pub trait OpeningBook: Send + Sync {
    /// Reply in coordinate notation for the position, if the book knows it
    fn lookup(&self, fen: &str, skill_level: u8) -> Option<String>;
}

/// One candidate reply and its relative weight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookMove {
    pub coordinate: String,
    pub weight: u32,
}

/// (position key, replies) rows of the built-in book
const BUILTIN_LINES: &[(&str, &[(&str, u32)])] = &[
    // Initial position
    (
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq",
        &[("e2e4", 40), ("d2d4", 35), ("g1f3", 15), ("c2c4", 10)],
    ),
    // 1. e4
    (
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq",
        &[("e7e5", 40), ("c7c5", 35), ("e7e6", 15), ("c7c6", 10)],
    ),
    // 1. d4
    (
        "rnbqkbnr/pppppppp/8/8/3P4/8/PPP1PPPP/RNBQKBNR b KQkq",
        &[("d7d5", 45), ("g8f6", 45), ("e7e6", 10)],
    ),
    // 1. c4
    (
        "rnbqkbnr/pppppppp/8/8/2P5/8/PP1PPPPP/RNBQKBNR b KQkq",
        &[("e7e5", 40), ("g8f6", 40), ("c7c5", 20)],
    ),
    // 1. Nf3
    (
        "rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R b KQkq",
        &[("d7d5", 50), ("g8f6", 50)],
    ),
    // 1. e4 e5
    (
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq",
        &[("g1f3", 70), ("f1c4", 15), ("b1c3", 15)],
    ),
    // 1. e4 e5 2. Nf3
    (
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq",
        &[("b8c6", 80), ("g8f6", 20)],
    ),
    // 1. e4 e5 2. Nf3 Nc6
    (
        "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq",
        &[("f1b5", 50), ("f1c4", 35), ("d2d4", 15)],
    ),
    // 1. e4 c5
    (
        "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq",
        &[("g1f3", 70), ("b1c3", 20), ("c2c3", 10)],
    ),
    // 1. e4 e6
    (
        "rnbqkbnr/pppp1ppp/4p3/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq",
        &[("d2d4", 85), ("d2d3", 15)],
    ),
    // 1. e4 c6
    (
        "rnbqkbnr/pp1ppppp/2p5/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq",
        &[("d2d4", 85), ("b1c3", 15)],
    ),
    // 1. d4 d5
    (
        "rnbqkbnr/ppp1pppp/8/3p4/3P4/8/PPP1PPPP/RNBQKBNR w KQkq",
        &[("c2c4", 60), ("g1f3", 25), ("c1f4", 15)],
    ),
    // 1. d4 Nf6
    (
        "rnbqkb1r/pppppppp/5n2/8/3P4/8/PPP1PPPP/RNBQKBNR w KQkq",
        &[("c2c4", 65), ("g1f3", 35)],
    ),
];

/// Book key: board, side to move and castling fields
pub fn book_key(fen: &str) -> String {
    fen.split_whitespace().take(3).collect::<Vec<_>>().join(" ")
}

/// Opening book compiled into the binary
#[derive(Debug)]
pub struct BuiltinOpeningBook {
    by_key: HashMap<String, Vec<BookMove>>,
    rng: Mutex<StdRng>,
}

impl Default for BuiltinOpeningBook {
    fn default() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl BuiltinOpeningBook {
    /// Book with a fixed seed, for reproducible choices
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let by_key = BUILTIN_LINES
            .iter()
            .map(|(key, replies)| {
                let moves = replies
                    .iter()
                    .map(|(coordinate, weight)| BookMove {
                        coordinate: coordinate.to_string(),
                        weight: *weight,
                    })
                    .collect();
                (key.to_string(), moves)
            })
            .collect();

        Self {
            by_key,
            rng: Mutex::new(rng),
        }
    }

    /// Candidate replies for the position, if any
    pub fn moves_for(&self, fen: &str) -> Option<&[BookMove]> {
        self.by_key.get(&book_key(fen)).map(Vec::as_slice)
    }

    /// Number of positions in the book
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

impl OpeningBook for BuiltinOpeningBook {
    fn lookup(&self, fen: &str, skill_level: u8) -> Option<String> {
        let moves = self.moves_for(fen)?;

        let choice = if skill_level >= BEST_REPLY_SKILL {
            highest_weight(moves)
        } else {
            choose_weighted(moves, &mut *self.rng.lock())
        }?;

        debug!("[BOOK] {} -> {}", book_key(fen), choice.coordinate);
        Some(choice.coordinate.clone())
    }
}

/// First of the heaviest replies
fn highest_weight(moves: &[BookMove]) -> Option<&BookMove> {
    moves
        .iter()
        .reduce(|best, m| if m.weight > best.weight { m } else { best })
}

fn choose_weighted<'a, R: Rng + ?Sized>(moves: &'a [BookMove], rng: &mut R) -> Option<&'a BookMove> {
    let total_weight: u64 = moves.iter().map(|m| u64::from(m.weight)).sum();
    if total_weight == 0 {
        return moves.first();
    }

    let mut pick = rng.random_range(0..total_weight);
    for m in moves {
        let w = u64::from(m.weight);
        if pick < w {
            return Some(m);
        }
        pick -= w;
    }
    moves.first()
}
