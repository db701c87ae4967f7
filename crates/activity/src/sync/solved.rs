//! Solved-question sync: walk the numbered progress list

use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::fetch::ProgressFetcher;
use super::progress::ProgressTracker;
use crate::error::SyncError;
use crate::iter::{Aggregate, CompositeIterator};
use crate::models::{NumberedPage, SyncState};
use crate::storage::{RecordStore, save_records};

/// Default number of records per progress-list page
pub const DEFAULT_PROGRESS_PAGE_SIZE: usize = 10;

/// Parameters for one solved-question sync
#[derive(Debug, Clone)]
pub struct SolvedSync {
    /// Records requested per page
    pub page_size: usize,
    /// Checked before every fetch
    pub cancel: CancellationToken,
}

impl Default for SolvedSync {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PROGRESS_PAGE_SIZE,
            cancel: CancellationToken::new(),
        }
    }
}

impl SolvedSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn validate(&self) -> Result<(), SyncError> {
        if self.page_size == 0 {
            return Err(SyncError::Validation("page size must be positive".to_string()));
        }
        Ok(())
    }
}

/// Pages retained by a solved-question sync, in fetch order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolvedPages {
    pages: Vec<NumberedPage>,
    /// Total page count declared by the first response
    pub total_pages: u32,
    /// Total record count declared by the first response
    pub total_records: u32,
}

impl SolvedPages {
    pub fn new(pages: Vec<NumberedPage>, total_pages: u32, total_records: u32) -> Self {
        Self {
            pages,
            total_pages,
            total_records,
        }
    }

    pub fn pages(&self) -> &[NumberedPage] {
        &self.pages
    }

    /// Number of records across all retained pages
    pub fn record_count(&self) -> usize {
        self.pages.iter().map(NumberedPage::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}

impl Aggregate for SolvedPages {
    type Iter<'a> = CompositeIterator<'a, NumberedPage>;

    fn create_iterator(&self) -> Self::Iter<'_> {
        CompositeIterator::new(&self.pages)
    }
}

/// Fetch every page of the solved-questions list
///
/// Wire page numbers go 0, 1, 2, ... while the caller-visible counter only
/// counts retained pages. The service answers wire pages 0 and 1 with the
/// same first page; a response that reports the same page number as the
/// last retained one is discarded without advancing the counter. The total
/// page count is taken from the first response and never revised.
///
/// Repeats are recognised by the page number the service reports back
/// (`currentPage`), not by the wire page that was requested. A service that
/// echoed the requested number would make wire pages 0 and 1 look distinct
/// and the first page would be retained twice.
///
/// Every fetch reports progress, including a discarded repeat and the final
/// empty page, so consumers see one value per request plus the completion.
///
/// The walk ends when the counter reaches the total, when a page comes back
/// empty, or when the wire page runs past `total + 1`. On success every
/// retained record is stored under its slug.
pub fn sync_solved(
    fetcher: &dyn ProgressFetcher,
    store: &dyn RecordStore,
    request: &SolvedSync,
    on_progress: &mut dyn FnMut(f64),
) -> Result<SolvedPages, SyncError> {
    request.validate()?;
    info!("Starting solved-question sync (page size {})", request.page_size);

    let mut state: SyncState<Vec<NumberedPage>> = SyncState::default();
    let mut progress = ProgressTracker::new(on_progress);
    let mut total_records = 0;

    while !state.all_pages_retained() {
        if request.cancel.is_cancelled() {
            info!("Solved sync cancelled after {} pages", state.page_index);
            return Err(SyncError::Cancelled);
        }
        if let Some(total) = state.total_pages {
            if state.wire_page > total + 1 {
                debug!(
                    "Wire page {} past declared total {}, stopping",
                    state.wire_page, total
                );
                break;
            }
        }

        let page = fetcher.fetch_progress(state.wire_page, request.page_size)?;
        state.wire_page += 1;

        if state.total_pages.is_none() {
            total_records = page.total_records;
        }
        let total = state.learn_total_pages(page.total_pages);

        if state.last_reported_page == Some(page.page_number) {
            debug!(
                "Discarding repeat of page {} (wire page {})",
                page.page_number,
                state.wire_page - 1
            );
            progress.report(state.page_progress());
            continue;
        }
        if page.is_empty() {
            debug!("Empty page at wire page {}, stopping", state.wire_page - 1);
            progress.report(state.page_progress());
            break;
        }

        state.last_reported_page = Some(page.page_number);
        state.page_index += 1;
        debug!(
            "Retained page {}/{} ({} records)",
            state.page_index,
            total,
            page.len()
        );
        state.accumulated.push(page);

        progress.report(state.page_progress());
    }

    progress.complete();

    let total_pages = state.total_pages.unwrap_or(0);
    let pages = SolvedPages::new(state.into_accumulated(), total_pages, total_records);
    let saved = save_records(
        store,
        pages.pages().iter().flat_map(|page| page.records.iter()),
    )?;
    info!(
        "Solved sync complete: {} pages, {} records stored",
        pages.pages().len(),
        saved
    );

    Ok(pages)
}
