//! Activity crate - Paginated sync of LeetCode activity
//!
//! This crate provides the platform-independent core of the grind tool:
//! - Domain models (Record, Page, NumberedPage, Cursor)
//! - LeetCode HTTP client and response decoding
//! - Sync loops for the submissions dump and the solved-questions list
//! - Page and composite iterators over retained pages
//! - Record storage trait with in-memory and SQLite backends
//!
//! The sync loops are synchronous and run on a background thread via
//! [`sync::SyncTask`]; the crate has no async runtime dependency.

pub mod config;
pub mod error;
pub mod iter;
pub mod leetcode;
pub mod models;
pub mod storage;
pub mod sync;

pub use config::{SessionCredentials, SyncSettings};
pub use error::{ExhaustedError, SyncError};
pub use iter::{Aggregate, CompositeIterator, PageIterator, Paged, RecordIterator};
pub use leetcode::LeetCodeClient;
pub use models::{
    Cursor, Displayable, Identifiable, NumberedPage, Page, Record, RecordId, RecordKind,
    SyncState, TitleSlug, time_ago,
};
pub use storage::{InMemoryRecordStore, RecordStore, SqliteRecordStore, load_record, save_record};
pub use sync::{
    // Sync execution
    SolvedPages, SolvedSync, SubmissionSync, sync_solved, sync_submissions,
    // Background tasks and progress
    SyncTask, progress_channel, spawn_solved_sync, spawn_submission_sync,
    // Fetcher seams
    ExponentialBackoff, NoRetry, ProgressFetcher, RetryPolicy, Retrying, SubmissionFetcher,
};
