//! Contract to an external move-strength engine.

pub mod uci;

pub use uci::{SearchLimits, UciEngine};

use std::time::Duration;

use thiserror::Error;

use crate::session::Elo;

/// How many ranked moves are offered to the user as hints.
pub const HINT_COUNT: usize = 5;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine did not answer within {0:?}")]
    Timeout(Duration),
    #[error("could not start engine {path}: {source}")]
    Spawn { path: String, source: std::io::Error },
    #[error("engine I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("engine process exited")]
    Exited,
    #[error("engine protocol error: {0}")]
    Protocol(String),
}

/// Hands out engine handles set up for one position at one strength.
pub trait Engine: Send + Sync {
    fn configure(&self, elo: Elo, fen: &str) -> Result<Box<dyn EngineHandle>, EngineError>;
}

/// A configured engine. Moves are in coordinate notation.
pub trait EngineHandle: Send {
    fn best_move(&mut self) -> Result<Option<String>, EngineError>;
    /// Up to `n` moves, strongest first.
    fn top_moves(&mut self, n: usize) -> Result<Vec<String>, EngineError>;
}
