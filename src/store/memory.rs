use std::collections::HashMap;
use std::sync::RwLock;

use super::{GameRecord, GameStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, GameRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.records.read().map(|r| r.len()).unwrap_or(0) }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl GameStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<GameRecord>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.get(key).cloned())
    }

    fn put(&self, key: &str, record: &GameRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        records.insert(key.to_string(), record.clone());
        Ok(())
    }
}
