//! Background sync tasks
//!
//! Each invocation runs on its own thread so the caller stays responsive.
//! Progress is handed over a rendezvous channel; dropping the task (or its
//! receiver) cancels the sync and unblocks the producer.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::Utc;
use log::{debug, warn};
use tokio_util::sync::{CancellationToken, DropGuard};

use super::fetch::{ProgressFetcher, SubmissionFetcher};
use super::progress::{ProgressReceiver, progress_channel};
use super::solved::{SolvedPages, SolvedSync, sync_solved};
use super::submissions::{SubmissionSync, sync_submissions};
use crate::error::SyncError;
use crate::models::Record;
use crate::storage::RecordStore;

/// Handle to a sync running on a background thread
pub struct SyncTask<T> {
    progress: ProgressReceiver,
    handle: JoinHandle<Result<T, SyncError>>,
    token: CancellationToken,
    guard: DropGuard,
}

impl<T: Send + 'static> SyncTask<T> {
    fn spawn(
        name: &str,
        token: CancellationToken,
        work: impl FnOnce(&mut dyn FnMut(f64)) -> Result<T, SyncError> + Send + 'static,
    ) -> Result<Self, SyncError> {
        let (mut sender, progress) = progress_channel();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let result = work(&mut |value: f64| sender.send(value));
                if let Err(e) = &result {
                    debug!("Sync thread finished with error: {}", e);
                }
                result
            })
            .map_err(SyncError::Spawn)?;

        Ok(Self {
            progress,
            handle,
            guard: token.clone().drop_guard(),
            token,
        })
    }

    /// Block until the next progress value; `None` once the sync has finished
    pub fn recv_progress(&self) -> Option<f64> {
        self.progress.recv()
    }

    /// Wait up to `timeout` for the next progress value
    ///
    /// Returns `None` on timeout as well as after the sync has finished; use
    /// [`SyncTask::is_finished`] to tell them apart.
    pub fn recv_progress_timeout(&self, timeout: Duration) -> Option<f64> {
        self.progress.recv_timeout(timeout).ok().flatten()
    }

    /// Blocking iterator over the remaining progress values
    pub fn progress(&self) -> impl Iterator<Item = f64> + '_ {
        self.progress.iter()
    }

    /// Request cancellation; takes effect before the next fetch
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the sync to finish and return its result
    ///
    /// Progress values not yet received are discarded.
    pub fn join(self) -> Result<T, SyncError> {
        let Self {
            progress,
            handle,
            token: _,
            guard,
        } = self;
        // Unblock a producer still waiting on a handoff
        drop(progress);
        let result = handle.join().map_err(|_| {
            warn!("Sync thread panicked");
            SyncError::TaskPanicked
        })?;
        let _ = guard.disarm();
        result
    }
}

/// Start a submission sync on a background thread
///
/// The request is validated before the thread starts, so a bad threshold is
/// reported here rather than from [`SyncTask::join`].
pub fn spawn_submission_sync<F>(
    fetcher: F,
    store: Arc<dyn RecordStore>,
    request: SubmissionSync,
) -> Result<SyncTask<Vec<Record>>, SyncError>
where
    F: SubmissionFetcher + 'static,
{
    request.validate(Utc::now())?;
    let token = request.cancel.clone();
    SyncTask::spawn("submission-sync", token, move |on_progress| {
        sync_submissions(&fetcher, store.as_ref(), &request, on_progress)
    })
}

/// Start a solved-question sync on a background thread
pub fn spawn_solved_sync<F>(
    fetcher: F,
    store: Arc<dyn RecordStore>,
    request: SolvedSync,
) -> Result<SyncTask<SolvedPages>, SyncError>
where
    F: ProgressFetcher + 'static,
{
    request.validate()?;
    let token = request.cancel.clone();
    SyncTask::spawn("solved-sync", token, move |on_progress| {
        sync_solved(&fetcher, store.as_ref(), &request, on_progress)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cursor, NumberedPage, Page};
    use crate::storage::InMemoryRecordStore;
    use chrono::Duration as ChronoDuration;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Serves `pages` pages of one record each, one hour apart
    struct HourlySubmissions {
        pages: u32,
        calls: AtomicU32,
    }

    impl SubmissionFetcher for HourlySubmissions {
        fn fetch_submissions(&self, cursor: &Cursor, _page_size: usize) -> Result<Page, SyncError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call >= self.pages {
                return Ok(Page::new(vec![], None, false));
            }
            let record = Record::builder(i64::from(call), format!("problem-{}", call).as_str())
                .timestamp(Utc::now() - ChronoDuration::hours(i64::from(call) + 1))
                .build();
            Ok(Page::new(vec![record], Some(format!("key-{}", cursor.offset)), true))
        }
    }

    struct Panics;

    impl ProgressFetcher for Panics {
        fn fetch_progress(&self, _wire_page: u32, _page_size: usize) -> Result<NumberedPage, SyncError> {
            panic!("fetcher bug");
        }
    }

    #[test]
    fn test_progress_arrives_in_order_and_ends_at_complete() {
        let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
        let fetcher = HourlySubmissions {
            pages: 4,
            calls: AtomicU32::new(0),
        };
        let request = SubmissionSync::new(Utc::now() - ChronoDuration::days(2));

        let task = spawn_submission_sync(fetcher, store.clone(), request).unwrap();
        let seen: Vec<f64> = task.progress().collect();
        let records = task.join().unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(store.len().unwrap(), 4);
        assert_eq!(seen.last(), Some(&100.0));
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_invalid_request_rejected_before_spawn() {
        let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
        let fetcher = HourlySubmissions {
            pages: 1,
            calls: AtomicU32::new(0),
        };
        let request = SubmissionSync::new(Utc::now() + ChronoDuration::hours(1));

        let result = spawn_submission_sync(fetcher, store, request);
        assert!(matches!(result, Err(SyncError::Validation(_))));
    }

    #[test]
    fn test_join_without_reading_progress() {
        let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
        let fetcher = HourlySubmissions {
            pages: 3,
            calls: AtomicU32::new(0),
        };
        let request = SubmissionSync::new(Utc::now() - ChronoDuration::days(1));

        let task = spawn_submission_sync(fetcher, store, request).unwrap();
        // The producer must not stay blocked on an unread handoff
        let records = task.join().unwrap();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_cancel_after_first_progress() {
        let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
        let fetcher = HourlySubmissions {
            pages: 50,
            calls: AtomicU32::new(0),
        };
        let request = SubmissionSync::new(Utc::now() - ChronoDuration::days(30));

        let task = spawn_submission_sync(fetcher, store.clone(), request).unwrap();
        assert!(task.recv_progress().is_some());
        task.cancel();
        assert!(task.is_cancelled());

        let result = task.join();
        assert!(matches!(result, Err(SyncError::Cancelled)));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_panicking_fetcher_reports_task_panicked() {
        let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
        let task = spawn_solved_sync(Panics, store, SolvedSync::new()).unwrap();
        assert_eq!(task.recv_progress(), None);
        assert!(matches!(task.join(), Err(SyncError::TaskPanicked)));
    }
}
