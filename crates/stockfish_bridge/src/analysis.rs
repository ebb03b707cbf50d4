//! Search results returned by the session

use serde::{Deserialize, Serialize};

/// Evaluation reported for a forced mate, in pawns, signed from the side to
/// move's point of view
pub const MATE_EVALUATION: f64 = 1000.0;

/// Most alternative first moves retained per search
pub const MAX_ALTERNATIVES: usize = 3;

/// How a search call came to an end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchCompletion {
    /// Engine answered with a `bestmove` line
    BestMove,
    /// Watchdog fired first; fields hold whatever had been streamed
    TimedOut,
    /// Session was not ready; nothing was sent to the engine
    NotReady,
}

/// Everything collected from one `go` cycle
///
/// `best_move` is empty when the engine produced none (timeout, not ready,
/// `bestmove (none)`). Callers must check for that rather than assume a move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineAnalysis {
    pub best_move: String,
    /// Pawns, positive favours the side to move
    pub evaluation: f64,
    pub mate_in: Option<i32>,
    pub depth: u32,
    pub nodes: u64,
    pub time_ms: u64,
    pub principal_variation: Vec<String>,
    pub alternatives: Vec<String>,
    pub nps: u64,
    /// Hash table fill, per mille as the engine reports it
    pub hashfull: u32,
    pub completion: SearchCompletion,
}

impl EngineAnalysis {
    /// Placeholder returned when analysis was requested too early
    pub fn not_ready() -> Self {
        Self {
            best_move: String::new(),
            evaluation: 0.0,
            mate_in: None,
            depth: 1,
            nodes: 0,
            time_ms: 0,
            principal_variation: Vec::new(),
            alternatives: Vec::new(),
            nps: 0,
            hashfull: 0,
            completion: SearchCompletion::NotReady,
        }
    }

    /// True when the engine named a move
    pub fn has_best_move(&self) -> bool {
        !self.best_move.is_empty()
    }

    /// True when the score is a forced mate rather than centipawns
    pub fn is_mate(&self) -> bool {
        self.mate_in.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_ready_shape() {
        let analysis = EngineAnalysis::not_ready();
        assert_eq!(analysis.depth, 1);
        assert!(!analysis.has_best_move());
        assert!(analysis.principal_variation.is_empty());
        assert_eq!(analysis.completion, SearchCompletion::NotReady);
    }
}
