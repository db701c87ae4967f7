//! In-memory storage implementation
//!
//! Used for tests and for runs that should not touch disk.

use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::sync::RwLock;

use super::RecordStore;

/// In-memory implementation of RecordStore
///
/// A HashMap protected by an RwLock for thread-safe access.
pub struct InMemoryRecordStore {
    entries: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
}

impl InMemoryRecordStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// All stored keys, sorted
    pub fn keys(&self) -> Result<Vec<Vec<u8>>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| anyhow!("record store lock poisoned"))?;
        let mut keys: Vec<Vec<u8>> = entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow!("record store lock poisoned"))?;
        entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| anyhow!("record store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn len(&self) -> Result<usize> {
        let entries = self
            .entries
            .read()
            .map_err(|_| anyhow!("record store lock poisoned"))?;
        Ok(entries.len())
    }
}
