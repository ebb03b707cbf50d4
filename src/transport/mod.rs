//! Engine transports provided by the host
//!
//! The bridge crate only defines the [`stockfish_bridge::EngineTransport`]
//! seam; the native executable behind it lives here.

pub mod process;

pub use process::ProcessTransport;
