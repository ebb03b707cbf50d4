//! Error types for the engine bridge
//!
//! Only two things fail loudly here: bringing the engine up, and the line
//! channel itself. A search that runs out of time or an engine that is not
//! ready yet produce degraded analyses instead (see
//! [`SearchCompletion`](crate::SearchCompletion)).

use thiserror::Error;

/// Failures of the duplex line channel to the engine process
#[derive(Error, Debug)]
pub enum TransportError {
    /// Engine binary could not be launched
    #[error("Failed to spawn engine: {reason}")]
    Spawn { reason: String },

    /// Command written before `start` succeeded
    #[error("Engine transport not started")]
    NotStarted,

    /// Output stream ended; the engine exited or the channel was dropped
    #[error("Engine channel closed")]
    Closed,

    /// Underlying pipe I/O error
    #[error("Engine I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by [`EngineSession`](crate::EngineSession)
#[derive(Error, Debug)]
pub enum EngineError {
    /// Handshake did not finish in time; the attempt may be retried
    #[error("Engine initialization timed out after {timeout_ms}ms")]
    InitTimeout { timeout_ms: u64 },

    /// Session was shut down and cannot be used again
    #[error("Engine session already stopped")]
    Stopped,

    /// Channel failure while talking to the engine
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl EngineError {
    /// True for failures worth another initialization attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::InitTimeout { .. })
    }
}

/// Result type alias for engine session operations
pub type EngineResult<T> = Result<T, EngineError>;
