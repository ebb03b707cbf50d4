//! Error types for the position core
//!
//! Only decoding can fail in this crate. Geometry queries and pattern
//! detectors are total functions over any [`Position`](crate::Position).

use thiserror::Error;

/// Errors that can occur while decoding positions and moves
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessCoreError {
    /// Position text is missing one of its mandatory fields
    #[error("Malformed position: {reason}")]
    MalformedPosition { reason: String },

    /// Square text is not a file letter followed by a rank digit
    #[error("Invalid square: {text}")]
    InvalidSquare { text: String },
}

/// Result type alias for position core operations
pub type ChessCoreResult<T> = Result<T, ChessCoreError>;
