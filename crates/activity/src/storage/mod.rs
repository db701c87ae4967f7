//! Storage traits and implementations
//!
//! This module defines the key-value persistence layer for activity records.
//! The trait-based design allows swapping between in-memory and persistent
//! storage implementations.

mod memory;
mod sqlite;
mod traits;

pub use memory::InMemoryRecordStore;
pub use sqlite::SqliteRecordStore;
pub use traits::{RecordStore, load_record, save_record, save_records};
