//! Attack and move geometry
//!
//! Pseudo-legal geometry only: which squares a piece threatens or could step
//! to, ignoring whether the move would leave its own king in check.
//!
//! ## Module Organization
//!
//! - `knight`, `king`, `pawn` - fixed-offset pieces
//! - `sliding` - ray walks for bishops, rooks and queens, plus attack lines
//! - `attack` - per-piece dispatch, attacker enumeration, check queries
//! - `destinations` - move targets for UI highlighting (pushes, castling)

mod attack;
mod destinations;
mod king;
mod knight;
mod pawn;
mod sliding;

pub use attack::{attackers_of, attacks_from, is_in_check, is_square_attacked, reachable_squares};
pub use destinations::destination_squares;
pub use sliding::attack_lines_from;
