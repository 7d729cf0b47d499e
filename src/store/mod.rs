//! Key-value persistence for game records.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("record {key} is corrupt: {reason}")]
    Corrupt { key: String, reason: String },
    #[error("invalid store key {0:?}")]
    InvalidKey(String),
    #[error("store lock poisoned")]
    Poisoned,
}

/// One game as the store sees it; every field is a string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// SAN moves joined with commas; empty for a new game.
    #[serde(default)]
    pub moves: String,
    #[serde(default)]
    pub assistant_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

/// Last write wins; there is no versioning between a read and the next write.
pub trait GameStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<GameRecord>, StoreError>;
    fn put(&self, key: &str, record: &GameRecord) -> Result<(), StoreError>;
}
