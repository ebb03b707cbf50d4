//! # Chess Core
//!
//! Position model, text codec, attack geometry and tactical pattern
//! detection for the analysis service.
//!
//! ## Architecture Overview
//!
//! ```text
//! chess_core/
//! ├── types        - Square, Color, Piece, PieceKind
//! ├── position     - Position aggregate and castling rights
//! ├── fen          - position text encode/decode
//! ├── move_gen/    - pseudo-legal attack and destination geometry
//! ├── tactics/     - pin, fork and hanging-piece detectors
//! ├── notation     - coordinate move strings (e2e4, e7e8q)
//! ├── constants    - material values, offsets, thresholds
//! └── error        - ChessCoreError
//! ```
//!
//! Everything here is synchronous and pure: a [`Position`] is built once and
//! borrowed by every query, so detectors can run on any thread without
//! coordination.
//!
//! ## Quick Start
//!
//! ```rust
//! use chess_core::{detect_all, summarize, Position};
//!
//! let position: Position = "7k/8/3r1b2/8/4N3/8/8/K7 w - - 0 1".parse().unwrap();
//! let report = summarize(detect_all(&position));
//! // The undefended rook on d6 hangs and outranks the fork itself
//! assert_eq!(report[0].pattern_type.label(), "hanging piece");
//! assert!(report.iter().any(|p| p.pattern_type.label() == "knight fork"));
//! ```
//!
//! ## Scope
//!
//! There is no legal move generator and no search. Geometry is pseudo-legal;
//! deciding what to play is the engine's job.

pub mod constants;
pub mod error;
mod fen;
pub mod move_gen;
pub mod notation;
pub mod position;
pub mod tactics;
pub mod types;

pub use error::{ChessCoreError, ChessCoreResult};
pub use move_gen::{
    attack_lines_from, attackers_of, attacks_from, destination_squares, is_in_check,
    is_square_attacked, reachable_squares,
};
pub use notation::{is_coordinate_move, ChessMove, CoordinateNotation, MoveNotation};
pub use position::{CastlingRights, Position};
pub use tactics::{
    default_detectors, detect_all, summarize, ForkDetector, HangingPieceDetector,
    PatternDetector, PatternSeverity, PatternType, PinDetector, TacticalPattern,
};
pub use types::{Color, Piece, PieceKind, Square};
