//! # Stockfish Bridge
//!
//! Drives an external UCI engine through a line channel: handshake, position
//! sync, strength calibration and streamed search parsing, with a watchdog
//! so a stalled engine degrades to a partial result instead of hanging the
//! caller.
//!
//! ## Architecture Overview
//!
//! ```text
//! stockfish_bridge/
//! ├── transport    - EngineTransport trait (the only I/O seam)
//! ├── session      - EngineSession state machine and search cycle
//! ├── info         - info/bestmove line parsing into SearchProgress
//! ├── calibration  - setoption lines and the go command
//! ├── settings     - EngineSettings and difficulty bands
//! ├── analysis     - EngineAnalysis result type
//! ├── completion   - settle-once slot shared by listener and watchdog
//! └── error        - EngineError, TransportError
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let session = EngineSession::new(Arc::new(my_transport));
//! session.initialize().await?;
//! session.set_position(&position).await?;
//!
//! let analysis = session.analyze(&EngineSettings::from_difficulty(DifficultyBand::Advanced)).await;
//! if analysis.has_best_move() {
//!     println!("{} ({:+.2})", analysis.best_move, analysis.evaluation);
//! }
//! ```
//!
//! The crate never spawns a process. Hosts supply an [`EngineTransport`].

pub mod analysis;
pub mod calibration;
mod completion;
pub mod error;
pub mod info;
pub mod session;
pub mod settings;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
pub mod transport;

pub use analysis::{EngineAnalysis, SearchCompletion};
pub use error::{EngineError, EngineResult, TransportError};
pub use session::{EngineSession, SessionState, SessionTimings};
pub use settings::{DifficultyBand, DifficultyProfile, EngineSettings};
pub use transport::EngineTransport;
