//! Printable analysis report
//!
//! Collects what one run produced and renders it either as plain text for
//! the terminal or as JSON for other tools.

use std::fmt;

use chess_core::{CoordinateNotation, MoveNotation, TacticalPattern};
use serde::Serialize;

use crate::analysis::{EvaluationSource, PositionEvaluation};

/// Output of one analyzer run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub fen: String,
    /// `None` when only tactics were requested
    pub evaluation: Option<PositionEvaluation>,
    pub tactics: Vec<TacticalPattern>,
}

impl AnalysisReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Position: {}", self.fen)?;

        if let Some(evaluation) = &self.evaluation {
            match &evaluation.best_move {
                Some(mv) => writeln!(
                    f,
                    "Best move: {} ({})",
                    CoordinateNotation.to_coordinate(mv),
                    source_label(evaluation.source)
                )?,
                None => writeln!(f, "Best move: none")?,
            }

            if evaluation.source != EvaluationSource::Book {
                match evaluation.mate_in {
                    Some(n) => writeln!(f, "Evaluation: mate in {}", n)?,
                    None => writeln!(f, "Evaluation: {:+.2}", evaluation.score)?,
                }
                writeln!(f, "Depth: {}", evaluation.depth)?;
                if !evaluation.principal_variation.is_empty() {
                    writeln!(f, "Line: {}", evaluation.principal_variation.join(" "))?;
                }
            }
        }

        if self.tactics.is_empty() {
            writeln!(f, "Tactics: none found")?;
        } else {
            writeln!(f, "Tactics:")?;
            for pattern in &self.tactics {
                writeln!(
                    f,
                    "  [{:?}] {} ({})",
                    pattern.severity, pattern.description, pattern.pattern_type
                )?;
            }
        }
        Ok(())
    }
}

fn source_label(source: EvaluationSource) -> &'static str {
    match source {
        EvaluationSource::Book => "book",
        EvaluationSource::Engine => "engine",
        EvaluationSource::Unavailable => "unavailable",
    }
}
