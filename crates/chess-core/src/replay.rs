//! SAN move replay against a rules-validating move generator.
//!
//! Positions are always re-derived by replaying a move prefix from the
//! starting position, so the same prefix yields the same FEN every time.

use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::{Chess, EnPassantMode, Position};
use thiserror::Error;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("unparseable SAN at ply {ply}: {san}")]
    BadSan { ply: usize, san: String },

    #[error("illegal move at ply {ply}: {san}")]
    IllegalMove { ply: usize, san: String },

    #[error("ply {count} out of range (game has {len} plies)")]
    OutOfRange { count: usize, len: usize },
}

/// Check that a full move line is legal from the starting position.
pub fn validate_line(moves: &[String]) -> Result<(), ReplayError> {
    replay(moves, moves.len()).map(|_| ())
}

/// FEN of the position after the first `count` plies.
/// `count == 0` is the starting position.
pub fn fen_after(moves: &[String], count: usize) -> Result<String, ReplayError> {
    let pos = replay(moves, count)?;
    Ok(Fen::from_position(&pos, EnPassantMode::Legal).to_string())
}

fn replay(moves: &[String], count: usize) -> Result<Chess, ReplayError> {
    if count > moves.len() {
        return Err(ReplayError::OutOfRange {
            count,
            len: moves.len(),
        });
    }

    let mut pos = Chess::default();
    for (ply, move_san) in moves[..count].iter().enumerate() {
        let san: San = move_san.parse().map_err(|_| ReplayError::BadSan {
            ply,
            san: move_san.clone(),
        })?;

        let mv = san.to_move(&pos).map_err(|_| ReplayError::IllegalMove {
            ply,
            san: move_san.clone(),
        })?;

        pos.play_unchecked(mv);
    }

    Ok(pos)
}
