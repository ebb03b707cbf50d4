//! Streamed search output parsing
//!
//! While a search runs the engine prints `info` lines. [`SearchProgress`]
//! folds them into a running summary, one line at a time:
//!
//! ```text
//! info depth 12 score cp 35 nodes 50000 nps 500000 hashfull 40 pv e2e4 e7e5
//! ```
//!
//! - `depth` keeps the highest value seen, engines re-report lower depths
//!   for secondary PV lines
//! - `score cp C` sets the evaluation to `C / 100` and clears any mate
//! - `score mate M` sets `mate_in` and the evaluation to `±MATE_EVALUATION`
//! - `pv ...` runs to the end of the line and replaces the stored PV only
//!   when every move is a well-formed coordinate move
//! - with `multipv N` for N > 1 the line contributes its first move to the
//!   alternatives and nothing else
//!
//! Lines that are not `info` lines, unknown keys and unparseable values are
//! skipped without touching the summary. A broken line never ends a search.

use chess_core::is_coordinate_move;

use crate::analysis::{EngineAnalysis, SearchCompletion, MATE_EVALUATION, MAX_ALTERNATIVES};

/// Move text an engine sends when it has no move to play
const NULL_MOVES: [&str; 2] = ["(none)", "0000"];

/// Running summary of the current search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchProgress {
    pub depth: u32,
    pub evaluation: f64,
    pub mate_in: Option<i32>,
    pub nodes: u64,
    pub nps: u64,
    pub hashfull: u32,
    pub time_ms: u64,
    pub principal_variation: Vec<String>,
    pub alternatives: Vec<String>,
}

impl SearchProgress {
    /// Fold one output line into the summary
    pub fn apply_line(&mut self, line: &str) {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("info") {
            return;
        }

        let mut multipv = 1u32;
        let mut score = None;
        let mut pv: Vec<&str> = Vec::new();

        while let Some(key) = tokens.next() {
            match key {
                "depth" => {
                    if let Some(depth) = next_number::<u32>(&mut tokens) {
                        self.depth = self.depth.max(depth);
                    }
                }
                "score" => score = parse_score(&mut tokens),
                "nodes" => {
                    if let Some(nodes) = next_number(&mut tokens) {
                        self.nodes = nodes;
                    }
                }
                "nps" => {
                    if let Some(nps) = next_number(&mut tokens) {
                        self.nps = nps;
                    }
                }
                "hashfull" => {
                    if let Some(hashfull) = next_number(&mut tokens) {
                        self.hashfull = hashfull;
                    }
                }
                "time" => {
                    if let Some(time_ms) = next_number(&mut tokens) {
                        self.time_ms = time_ms;
                    }
                }
                "multipv" => {
                    if let Some(index) = next_number(&mut tokens) {
                        multipv = index;
                    }
                }
                "pv" => {
                    pv = tokens.by_ref().collect();
                }
                // free text until end of line
                "string" => break,
                _ => {}
            }
        }

        // Secondary lines only feed the alternatives list
        if multipv == 1 {
            match score {
                Some(Score::Centipawns(cp)) => {
                    self.evaluation = f64::from(cp) / 100.0;
                    self.mate_in = None;
                }
                Some(Score::Mate(moves)) => {
                    self.mate_in = Some(moves);
                    self.evaluation = if moves > 0 {
                        MATE_EVALUATION
                    } else {
                        -MATE_EVALUATION
                    };
                }
                None => {}
            }
        }

        self.apply_pv(&pv, multipv);
    }

    fn apply_pv(&mut self, pv: &[&str], multipv: u32) {
        if pv.is_empty() || !pv.iter().all(|mv| is_coordinate_move(mv)) {
            return;
        }

        let first = pv[0].to_string();
        if self.alternatives.len() < MAX_ALTERNATIVES && !self.alternatives.contains(&first) {
            self.alternatives.push(first);
        }

        if multipv == 1 {
            self.principal_variation = pv.iter().map(|mv| mv.to_string()).collect();
        }
    }

    /// Snapshot the summary as a finished analysis
    pub fn to_analysis(&self, best_move: String, completion: SearchCompletion) -> EngineAnalysis {
        EngineAnalysis {
            best_move,
            evaluation: self.evaluation,
            mate_in: self.mate_in,
            depth: self.depth,
            nodes: self.nodes,
            time_ms: self.time_ms,
            principal_variation: self.principal_variation.clone(),
            alternatives: self.alternatives.clone(),
            nps: self.nps,
            hashfull: self.hashfull,
            completion,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Score {
    Centipawns(i32),
    Mate(i32),
}

fn parse_score<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Option<Score> {
    match tokens.next()? {
        "cp" => next_number(tokens).map(Score::Centipawns),
        "mate" => next_number(tokens).map(Score::Mate),
        _ => None,
    }
}

fn next_number<'a, T: std::str::FromStr>(tokens: &mut impl Iterator<Item = &'a str>) -> Option<T> {
    tokens.next().and_then(|t| t.parse().ok())
}

/// Extract the move from a `bestmove` line
///
/// Returns `None` for any other line, and `Some("")` when the engine
/// reports that it has no move.
pub fn parse_best_move(line: &str) -> Option<String> {
    let mut tokens = line.split_whitespace();
    if tokens.next() != Some("bestmove") {
        return None;
    }

    let mv = tokens.next().unwrap_or_default();
    if NULL_MOVES.contains(&mv) || !is_coordinate_move(mv) {
        return Some(String::new());
    }
    Some(mv.to_string())
}
