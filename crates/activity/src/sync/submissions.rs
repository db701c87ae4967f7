//! Submission sync: walk the submissions dump back to a threshold time

use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use tokio_util::sync::CancellationToken;

use super::dedupe::dedupe_consecutive;
use super::fetch::SubmissionFetcher;
use super::progress::{ProgressTracker, threshold_progress};
use crate::error::SyncError;
use crate::models::{Record, SyncState};
use crate::storage::{RecordStore, save_records};

/// Default number of records per submissions call
pub const DEFAULT_SUBMISSIONS_PAGE_SIZE: usize = 20;

/// Parameters for one submission sync
#[derive(Debug, Clone)]
pub struct SubmissionSync {
    /// Oldest point in time to walk back to
    pub threshold: DateTime<Utc>,
    /// Records requested per call
    pub page_size: usize,
    /// Checked before every fetch
    pub cancel: CancellationToken,
}

impl SubmissionSync {
    pub fn new(threshold: DateTime<Utc>) -> Self {
        Self {
            threshold,
            page_size: DEFAULT_SUBMISSIONS_PAGE_SIZE,
            cancel: CancellationToken::new(),
        }
    }

    /// Walk back `days` days from now
    pub fn lookback_days(days: i64) -> Self {
        Self::new(Utc::now() - Duration::days(days))
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Reject requests the loop cannot run
    ///
    /// The threshold must not be after `now`.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), SyncError> {
        if self.threshold > now {
            return Err(SyncError::Validation(format!(
                "threshold time {} is in the future",
                self.threshold
            )));
        }
        if self.page_size == 0 {
            return Err(SyncError::Validation("page size must be positive".to_string()));
        }
        Ok(())
    }
}

/// Fetch submissions newest-first until the walk passes the threshold
///
/// Each page is deduped (consecutive repeats of a problem collapse to the
/// newest attempt) before being accumulated. The offset advances by the raw
/// record count so it tracks the server-side position. The walk stops when
/// the oldest record seen is at or before the threshold, or when a page
/// comes back empty.
///
/// On top of those two rules, a response with `has_next: false` also ends
/// the walk, even if the threshold has not been reached yet.
///
/// On success every accumulated record is stored under its slug and the
/// full list is returned. A fetch error aborts the walk, propagates
/// unchanged, and nothing is stored.
pub fn sync_submissions(
    fetcher: &dyn SubmissionFetcher,
    store: &dyn RecordStore,
    request: &SubmissionSync,
    on_progress: &mut dyn FnMut(f64),
) -> Result<Vec<Record>, SyncError> {
    let now = Utc::now();
    request.validate(now)?;

    info!(
        "Starting submission sync back to {} (page size {})",
        request.threshold, request.page_size
    );

    let mut state: SyncState<Vec<Record>> = SyncState::default();
    let mut progress = ProgressTracker::new(on_progress);
    let mut anchor = now;

    while anchor > request.threshold {
        if request.cancel.is_cancelled() {
            info!("Submission sync cancelled after {} pages", state.page_index);
            return Err(SyncError::Cancelled);
        }

        let page = fetcher.fetch_submissions(&state.cursor, request.page_size)?;
        let raw_count = page.len();
        let has_more = page.has_more;

        if let Some(oldest) = page.records.last() {
            anchor = oldest.timestamp;
        }
        state.cursor = state.cursor.advanced(raw_count, page.next_cursor.clone());
        state.page_index += 1;

        let kept = dedupe_consecutive(page.records);
        debug!(
            "Page {}: {} records ({} after dedup), offset now {}, anchor {}",
            state.page_index,
            raw_count,
            kept.len(),
            state.cursor.offset,
            anchor
        );
        state.accumulated.extend(kept);

        progress.report(threshold_progress(now, anchor, request.threshold));

        if raw_count == 0 {
            debug!("Submissions exhausted at offset {}", state.cursor.offset);
            break;
        }
        if !has_more {
            debug!("Service reported no more submissions");
            break;
        }
    }

    progress.complete();

    let records = state.into_accumulated();
    let saved = save_records(store, &records)?;
    info!("Submission sync complete: {} records stored", saved);

    Ok(records)
}
