//! Position handling on top of cozy-chess: replay from SAN history, SAN
//! rendering, repetition counting and game termination.

pub mod cozy;
pub mod outcome;
pub mod san;

pub use cozy::Position;
pub use outcome::Termination;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("invalid FEN {fen:?}: {reason}")]
    Fen { fen: String, reason: String },
    #[error("illegal move {uci}")]
    Illegal { uci: String },
    #[error("move {san:?} at ply {ply} does not apply to the replayed position")]
    Replay { ply: usize, san: String },
}
