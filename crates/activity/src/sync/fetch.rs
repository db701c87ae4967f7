//! Page fetcher contracts
//!
//! One call fetches one page. Implementations must not mutate shared state
//! beyond the network call itself; the sync loops own all cursor bookkeeping.

use std::sync::Arc;

use crate::error::SyncError;
use crate::models::{Cursor, NumberedPage, Page};

/// Cursor/offset-style source (the submissions dump)
pub trait SubmissionFetcher: Send + Sync {
    /// Fetch the page starting at `cursor`, at most `page_size` records
    ///
    /// Returns raw records in service order; the caller dedupes.
    fn fetch_submissions(&self, cursor: &Cursor, page_size: usize) -> Result<Page, SyncError>;
}

/// Page-number-style source (the solved-questions progress list)
pub trait ProgressFetcher: Send + Sync {
    /// Fetch wire page `wire_page` with `page_size` records per page
    fn fetch_progress(&self, wire_page: u32, page_size: usize) -> Result<NumberedPage, SyncError>;
}

impl<T: SubmissionFetcher + ?Sized> SubmissionFetcher for &T {
    fn fetch_submissions(&self, cursor: &Cursor, page_size: usize) -> Result<Page, SyncError> {
        (**self).fetch_submissions(cursor, page_size)
    }
}

impl<T: SubmissionFetcher + ?Sized> SubmissionFetcher for Arc<T> {
    fn fetch_submissions(&self, cursor: &Cursor, page_size: usize) -> Result<Page, SyncError> {
        (**self).fetch_submissions(cursor, page_size)
    }
}

impl<T: ProgressFetcher + ?Sized> ProgressFetcher for &T {
    fn fetch_progress(&self, wire_page: u32, page_size: usize) -> Result<NumberedPage, SyncError> {
        (**self).fetch_progress(wire_page, page_size)
    }
}

impl<T: ProgressFetcher + ?Sized> ProgressFetcher for Arc<T> {
    fn fetch_progress(&self, wire_page: u32, page_size: usize) -> Result<NumberedPage, SyncError> {
        (**self).fetch_progress(wire_page, page_size)
    }
}
