//! Core module - configuration, errors and logging for the host application
//!
//! # Architecture Overview
//!
//! - [`settings`] - [`AnalyzerSettings`] and their JSON persistence
//! - [`logging`] - tracing subscriber initialisation
//! - [`error`] - [`ConfigError`] shared by both
//!
//! Nothing here touches the engine or the board; the binary wires these
//! pieces to the analysis service.
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use xfchess_analyzer::core::{init_logging, load_or_default, AnalyzerSettings};
//!
//! let settings = load_or_default(&AnalyzerSettings::default_path());
//! init_logging(&settings.log_level)?;
//! ```

pub mod error;
pub mod logging;
pub mod settings;

pub use error::{ConfigError, ConfigResult};
pub use logging::init_logging;
pub use settings::{load_or_default, AnalyzerSettings};
