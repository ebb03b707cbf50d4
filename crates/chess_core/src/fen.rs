//! Position text codec
//!
//! Reads and writes the six-field position string:
//!
//! ```text
//! rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1
//! └──────────── board ──────────────────────┘ │  │    │  │ └ full-move number
//!                                           side │    │  └ half-move clock
//!                                         castling   en passant
//! ```
//!
//! ## Leniency
//!
//! Only the first four fields are mandatory. Parsing fails with
//! [`ChessCoreError::MalformedPosition`] when fewer are present; every other
//! irregularity degrades to a default:
//!
//! | Field       | Irregular input           | Result            |
//! |-------------|---------------------------|-------------------|
//! | board       | unknown letter, overflow  | character dropped |
//! | side        | anything but `b`          | White             |
//! | castling    | letters outside `KQkq`    | ignored           |
//! | en passant  | not a square              | `None`            |
//! | half-move   | missing / not a number    | 0                 |
//! | full-move   | missing / not a number / 0| 1                 |

use std::fmt;
use std::str::FromStr;

use crate::error::{ChessCoreError, ChessCoreResult};
use crate::position::{CastlingRights, Position};
use crate::types::{Color, Piece, Square};

impl Position {
    /// Decode a position string
    ///
    /// # Errors
    ///
    /// [`ChessCoreError::MalformedPosition`] when the text has fewer than four
    /// whitespace-separated fields.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chess_core::{Color, Position};
    ///
    /// let position = Position::from_fen("8/8/8/8/8/8/8/4K3 b - - 0 40").unwrap();
    /// assert_eq!(position.side_to_move, Color::Black);
    /// assert_eq!(position.fullmove_number, 40);
    /// assert!(Position::from_fen("8/8/8/8/8/8/8/8 w").is_err());
    /// ```
    pub fn from_fen(text: &str) -> ChessCoreResult<Position> {
        let fields: Vec<&str> = text.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(ChessCoreError::MalformedPosition {
                reason: format!("expected at least 4 fields, found {}", fields.len()),
            });
        }

        let side_to_move = if fields[1] == "b" {
            Color::Black
        } else {
            Color::White
        };

        let halfmove_clock = fields
            .get(4)
            .and_then(|f| f.parse::<u32>().ok())
            .unwrap_or(0);
        let fullmove_number = fields
            .get(5)
            .and_then(|f| f.parse::<u32>().ok())
            .filter(|n| *n >= 1)
            .unwrap_or(1);

        Ok(Position {
            board: parse_board(fields[0]),
            side_to_move,
            castling: parse_castling(fields[2]),
            en_passant: fields[3].parse::<Square>().ok(),
            halfmove_clock,
            fullmove_number,
        })
    }

    /// Encode as a position string
    ///
    /// Inverse of [`Position::from_fen`] for positions it produced.
    pub fn to_fen(&self) -> String {
        let side = match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let en_passant = self
            .en_passant
            .map(|sq| sq.to_string())
            .unwrap_or_else(|| "-".to_string());

        format!(
            "{} {} {} {} {} {}",
            board_field(self),
            side,
            castling_field(&self.castling),
            en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

impl FromStr for Position {
    type Err = ChessCoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}

/// Walk ranks 8→1, files a→h
fn parse_board(field: &str) -> std::collections::BTreeMap<Square, Piece> {
    let mut board = std::collections::BTreeMap::new();

    for (row, rank_text) in field.split('/').enumerate() {
        let rank_index = 7 - row as i8;
        if rank_index < 0 {
            break;
        }

        let mut file_index: i8 = 0;
        for c in rank_text.chars() {
            // Past file h: the rest of the rank is dropped
            if file_index >= 8 {
                break;
            }
            if let Some(skip) = c.to_digit(10) {
                file_index += skip as i8;
                continue;
            }
            if let Some(piece) = Piece::from_fen_char(c) {
                if let Some(square) = Square::from_indices(file_index, rank_index) {
                    board.insert(square, piece);
                }
                file_index += 1;
            }
        }
    }

    board
}

fn parse_castling(field: &str) -> CastlingRights {
    let mut rights = CastlingRights::none();
    for c in field.chars() {
        match c {
            'K' => rights.white_kingside = true,
            'Q' => rights.white_queenside = true,
            'k' => rights.black_kingside = true,
            'q' => rights.black_queenside = true,
            _ => {}
        }
    }
    rights
}

fn board_field(position: &Position) -> String {
    let mut out = String::with_capacity(72);

    for rank_index in (0..8).rev() {
        let mut empty_run = 0;
        for file_index in 0..8 {
            let piece = Square::from_indices(file_index, rank_index)
                .and_then(|sq| position.piece_at(sq));
            match piece {
                Some(piece) => {
                    if empty_run > 0 {
                        out.push_str(&empty_run.to_string());
                        empty_run = 0;
                    }
                    out.push(piece.to_fen_char());
                }
                None => empty_run += 1,
            }
        }
        if empty_run > 0 {
            out.push_str(&empty_run.to_string());
        }
        if rank_index > 0 {
            out.push('/');
        }
    }

    out
}

fn castling_field(rights: &CastlingRights) -> String {
    let mut out = String::new();
    if rights.white_kingside {
        out.push('K');
    }
    if rights.white_queenside {
        out.push('Q');
    }
    if rights.black_kingside {
        out.push('k');
    }
    if rights.black_queenside {
        out.push('q');
    }
    if out.is_empty() {
        out.push('-');
    }
    out
}
