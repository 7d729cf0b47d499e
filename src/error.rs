use thiserror::Error;

use crate::board::BoardError;
use crate::codec::DecodeError;
use crate::engine::EngineError;
use crate::normalize::MoveError;
use crate::store::StoreError;

/// Every way a session operation can fail.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing request fields.
    #[error("{0}")]
    Validation(String),
    #[error("No game found")]
    NotFound,
    /// The session is left untouched.
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The engine was slow or broken; safe to retry.
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    Internal(String),
}

impl Error {
    pub fn is_retryable(&self) -> bool { matches!(self, Error::Engine(_)) }
}

impl From<BoardError> for Error {
    fn from(e: BoardError) -> Self { Error::Internal(e.to_string()) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
