//! # XFChess Analyzer
//!
//! Host application around [`chess_core`] and [`stockfish_bridge`]: picks a
//! move from the opening book or the engine, scores the position and lists
//! the tactical patterns on the board.
//!
//! ```text
//! xfchess-analyzer/
//! ├── core       - settings persistence, logging, config errors
//! ├── analysis   - AnalysisService, opening book
//! ├── transport  - native engine process
//! ├── report     - text / JSON rendering
//! └── cli        - clap flags and overrides
//! ```

pub mod analysis;
pub mod cli;
pub mod core;
pub mod report;
pub mod transport;

pub use analysis::{AnalysisService, BuiltinOpeningBook, EvaluationSource, OpeningBook, PositionEvaluation};
pub use report::AnalysisReport;
pub use transport::ProcessTransport;
