//! # Constants - Material Values & Movement Vectors
//!
//! ## Centipawn Valuation
//!
//! Tactical findings are scored in centipawns, pawn = 100:
//!
//! - **Pawn**: 100
//! - **Knight**: 300
//! - **Bishop**: 300
//! - **Rook**: 500
//! - **Queen**: 900
//! - **King**: 1,000
//!
//! The king value only has to outrank the queen so that "most valuable
//! target" selection prefers it. It is kept small enough that fork values
//! including a king stay readable in reports.
//!
//! ## Direction Vectors
//!
//! Movement is expressed as `(d_file, d_rank)` pairs applied through
//! [`Square::offset`](crate::Square::offset), so off-board destinations fall
//! out as `None` without any wrap-around checks.

pub const PAWN_VALUE: i32 = 100;
pub const KNIGHT_VALUE: i32 = 300;
pub const BISHOP_VALUE: i32 = 300;
pub const ROOK_VALUE: i32 = 500;
pub const QUEEN_VALUE: i32 = 900;
pub const KING_VALUE: i32 = 1000;

/// Knight L-shapes
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// King adjacencies
pub const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Rook rays: north, east, south, west
pub const ORTHOGONAL_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Bishop rays: north-east, south-east, south-west, north-west
pub const DIAGONAL_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Queen rays
pub const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, -1),
    (-1, 1),
];

/// Standard initial position
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Value at or above which a hanging piece is critical (rook and up)
pub const CRITICAL_MATERIAL_THRESHOLD: i32 = 500;

/// Value at or above which a hanging piece is high severity (minor pieces)
pub const HIGH_MATERIAL_THRESHOLD: i32 = 300;

/// Net fork gain above which a non-royal fork is high severity
pub const HIGH_FORK_THRESHOLD: i32 = 500;
