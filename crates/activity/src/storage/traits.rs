//! Storage trait definitions

use anyhow::{Context, Result};

use crate::models::{Record, TitleSlug};

/// Trait for durable key-value persistence
///
/// Keys are problem slugs, values are JSON-serialized records. Writes are
/// last-write-wins; the sync engine never deletes or updates in place.
pub trait RecordStore: Send + Sync {
    /// Insert or overwrite the value stored under `key`
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Get the value stored under `key`
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Number of stored keys
    fn len(&self) -> Result<usize>;

    /// Check if the store holds no keys
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Serialize a record and store it under its slug
pub fn save_record(store: &dyn RecordStore, record: &Record) -> Result<()> {
    let value = serde_json::to_vec(record)
        .with_context(|| format!("Failed to serialize record {}", record.slug))?;
    store.put(record.slug.as_bytes(), &value)
}

/// Store every record, one put per record, in order
///
/// Later records overwrite earlier ones sharing a slug.
pub fn save_records<'a>(
    store: &dyn RecordStore,
    records: impl IntoIterator<Item = &'a Record>,
) -> Result<usize> {
    let mut saved = 0;
    for record in records {
        save_record(store, record)?;
        saved += 1;
    }
    Ok(saved)
}

/// Load the record stored under `slug`
pub fn load_record(store: &dyn RecordStore, slug: &TitleSlug) -> Result<Option<Record>> {
    match store.get(slug.as_bytes())? {
        Some(bytes) => {
            let record = serde_json::from_slice(&bytes)
                .with_context(|| format!("Failed to parse stored record {}", slug))?;
            Ok(Some(record))
        }
        None => Ok(None),
    }
}
