//! Analysis service
//!
//! [`AnalysisService`] answers "what should be played here, and how good is
//! the position" by combining three collaborators, all injected at
//! construction:
//!
//! - an [`OpeningBook`], consulted first during the opening
//! - an [`EngineSession`], used when the book has nothing
//! - a [`MoveNotation`], turning coordinate strings into [`ChessMove`]s
//!
//! # Fallback Chain
//!
//! ```text
//! book enabled && history < BOOK_PLY_LIMIT ──hit──> book move
//!         │ miss / unparseable
//!         v
//! analyze_position ──bestmove──> engine move
//!         │ empty / unparseable
//!         v
//!       no move (logged, never an error)
//! ```
//!
//! Tactical reports bypass all of this; detectors only need the position.

use std::sync::Arc;
use std::time::Duration;

use chess_core::{detect_all, summarize, ChessMove, MoveNotation, Position, TacticalPattern};
use serde::Serialize;
use stockfish_bridge::{EngineAnalysis, EngineResult, EngineSession, EngineSettings};
use tracing::{debug, error, info, warn};

use super::opening_book::OpeningBook;

/// Book is only consulted while fewer half-moves than this were played
pub const BOOK_PLY_LIMIT: usize = 12;

/// Where an evaluation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EvaluationSource {
    Book,
    Engine,
    /// Neither book nor engine produced a usable move
    Unavailable,
}

/// Move plus score bundle returned by [`AnalysisService::analyze_with_evaluation`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionEvaluation {
    pub best_move: Option<ChessMove>,
    /// Pawns from the side to move's point of view; 0 for book moves
    pub score: f64,
    pub is_mate: bool,
    pub mate_in: Option<i32>,
    pub depth: u32,
    pub principal_variation: Vec<String>,
    pub source: EvaluationSource,
}

impl PositionEvaluation {
    fn from_book(mv: ChessMove) -> Self {
        Self {
            best_move: Some(mv),
            score: 0.0,
            is_mate: false,
            mate_in: None,
            depth: 0,
            principal_variation: Vec::new(),
            source: EvaluationSource::Book,
        }
    }

    fn from_engine(analysis: &EngineAnalysis, best_move: Option<ChessMove>) -> Self {
        Self {
            source: if best_move.is_some() {
                EvaluationSource::Engine
            } else {
                EvaluationSource::Unavailable
            },
            best_move,
            score: analysis.evaluation,
            is_mate: analysis.is_mate(),
            mate_in: analysis.mate_in,
            depth: analysis.depth,
            principal_variation: analysis.principal_variation.clone(),
        }
    }
}

/// Book, engine and notation wired together
pub struct AnalysisService {
    session: Arc<EngineSession>,
    book: Arc<dyn OpeningBook>,
    notation: Arc<dyn MoveNotation>,
}

impl AnalysisService {
    pub fn new(
        session: Arc<EngineSession>,
        book: Arc<dyn OpeningBook>,
        notation: Arc<dyn MoveNotation>,
    ) -> Self {
        Self {
            session,
            book,
            notation,
        }
    }

    /// The engine session this service drives
    pub fn session(&self) -> &EngineSession {
        &self.session
    }

    /// Initialize the engine, retrying handshake timeouts
    ///
    /// Waits `base_backoff`, then twice that, and so on between attempts.
    /// Errors other than [`stockfish_bridge::EngineError::InitTimeout`] are
    /// returned at once.
    ///
    /// # Errors
    ///
    /// The last error once `attempts` are used up.
    pub async fn initialize_with_retry(&self, attempts: u32, base_backoff: Duration) -> EngineResult<()> {
        let attempts = attempts.max(1);
        let mut backoff = base_backoff;
        let mut attempt = 1;

        loop {
            match self.session.initialize().await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_retryable() && attempt < attempts => {
                    warn!(
                        "[ANALYSIS] Engine init attempt {}/{} failed: {}. Retrying in {:?}",
                        attempt, attempts, e, backoff
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = backoff.saturating_mul(2);
                    attempt += 1;
                }
                Err(e) => {
                    error!("[ANALYSIS] Engine init failed after {} attempt(s): {}", attempt, e);
                    return Err(e);
                }
            }
        }
    }

    /// Best move for `position`, or `None` when nothing usable came back
    ///
    /// `history_len` is the number of half-moves played in the game so far;
    /// it gates the book lookup.
    pub async fn analyze_best_move(
        &self,
        position: &Position,
        history_len: usize,
        settings: &EngineSettings,
    ) -> Option<ChessMove> {
        if let Some(mv) = self.book_move(position, history_len, settings) {
            return Some(mv);
        }

        let analysis = self.session.analyze_position(position, settings).await;
        if !analysis.has_best_move() {
            warn!(
                "[ANALYSIS] Engine returned no move ({:?}) for {}",
                analysis.completion, position
            );
            return None;
        }
        self.translate(&analysis.best_move, position)
    }

    /// Best move plus score, mate flag and variation
    ///
    /// Never fails. When neither source yields a move the evaluation still
    /// carries whatever score the engine produced, with
    /// [`EvaluationSource::Unavailable`].
    pub async fn analyze_with_evaluation(
        &self,
        position: &Position,
        history_len: usize,
        settings: &EngineSettings,
    ) -> PositionEvaluation {
        if let Some(mv) = self.book_move(position, history_len, settings) {
            return PositionEvaluation::from_book(mv);
        }

        let analysis = self.session.analyze_position(position, settings).await;

        let best_move = if analysis.has_best_move() {
            self.translate(&analysis.best_move, position)
        } else {
            warn!(
                "[ANALYSIS] Engine returned no move ({:?}) for {}",
                analysis.completion, position
            );
            None
        };

        let evaluation = PositionEvaluation::from_engine(&analysis, best_move);
        info!(
            "[ANALYSIS] {:?} score {:+.2} depth {} via {:?}",
            evaluation.best_move.map(|m| self.notation.to_coordinate(&m)),
            evaluation.score,
            evaluation.depth,
            evaluation.source
        );
        evaluation
    }

    /// Every tactical pattern in `position`, most urgent first
    pub fn tactical_report(&self, position: &Position) -> Vec<TacticalPattern> {
        let patterns = summarize(detect_all(position));
        debug!("[ANALYSIS] {} tactical patterns found", patterns.len());
        patterns
    }

    fn book_move(&self, position: &Position, history_len: usize, settings: &EngineSettings) -> Option<ChessMove> {
        if !settings.use_opening_book || history_len >= BOOK_PLY_LIMIT {
            return None;
        }

        let coordinate = self.book.lookup(&position.to_fen(), settings.effective_skill())?;
        let mv = self.translate(&coordinate, position);
        if mv.is_some() {
            info!("[BOOK] Playing book move {}", coordinate);
        }
        mv
    }

    fn translate(&self, coordinate: &str, position: &Position) -> Option<ChessMove> {
        if coordinate.is_empty() {
            return None;
        }
        let mv = self.notation.parse_coordinate(coordinate, position);
        if mv.is_none() {
            warn!("[ANALYSIS] Unparseable move {:?} for {}", coordinate, position);
        }
        mv
    }
}
