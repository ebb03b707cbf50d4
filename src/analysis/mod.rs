//! Move selection and position evaluation on top of the engine session

pub mod opening_book;
pub mod orchestrator;

pub use opening_book::{BookMove, BuiltinOpeningBook, OpeningBook};
pub use orchestrator::{AnalysisService, EvaluationSource, PositionEvaluation, BOOK_PLY_LIMIT};
