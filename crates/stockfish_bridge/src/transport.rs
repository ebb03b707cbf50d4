//! The line channel to an engine process
//!
//! The session never spawns anything itself. It talks to an
//! [`EngineTransport`]: something that can be started, accepts one command
//! line at a time and fans every output line out to subscribers. A native
//! process, a web worker bridge or an in-memory script are all just
//! implementations of this trait, and live outside this crate (the scripted
//! one in [`crate::testing`] excepted).
//!
//! # Subscription semantics
//!
//! Output is delivered through a `tokio::sync::broadcast` channel. A
//! receiver only sees lines sent *after* it subscribed, so callers subscribe
//! before writing the command whose reply they are waiting for.
//!
//! ```rust,ignore
//! let mut lines = transport.subscribe();
//! transport.send("isready").await?;
//! while let Ok(line) = lines.recv().await {
//!     if line.trim() == "readyok" {
//!         break;
//!     }
//! }
//! ```

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::TransportError;

/// Broadcast capacity used by the bundled transports
///
/// A deep search at high multi-PV emits a few hundred info lines per second;
/// receivers that fall further behind than this skip ahead.
pub const LINE_CHANNEL_CAPACITY: usize = 1024;

/// Duplex line channel to a UCI engine
#[async_trait]
pub trait EngineTransport: Send + Sync {
    /// Bring the engine up. Calling it again on a running transport is a
    /// no-op, so a retried handshake can call it unconditionally.
    async fn start(&self) -> Result<(), TransportError>;

    /// Write one command line (without trailing newline)
    async fn send(&self, command: &str) -> Result<(), TransportError>;

    /// Receiver for every output line emitted from now on
    fn subscribe(&self) -> broadcast::Receiver<String>;

    /// Release the engine. Further sends fail with [`TransportError::NotStarted`].
    async fn shutdown(&self) -> Result<(), TransportError>;
}
