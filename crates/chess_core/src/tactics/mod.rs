//! Tactical pattern detection
//!
//! Three independent detectors share the [`PatternDetector`] trait:
//!
//! - [`PinDetector`] - pins and absolute pins by sliding pieces
//! - [`ForkDetector`] - knight, pawn and royal forks, double attacks
//! - [`HangingPieceDetector`] - attacked pieces without defenders
//!
//! [`detect_all`] runs them together and concatenates their output.

mod detector;
mod fork;
mod hanging;
mod pin;
mod types;

pub use detector::{default_detectors, detect_all, summarize, PatternDetector};
pub use fork::ForkDetector;
pub use hanging::HangingPieceDetector;
pub use pin::PinDetector;
pub use types::{PatternSeverity, PatternType, TacticalPattern};
