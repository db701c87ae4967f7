//! Sync engine for paginated activity
//!
//! Two loops share one shape: fetch a page, fold it into per-invocation
//! state, report progress, decide whether to continue. Records are stored
//! only once a loop reaches Done, so a failed invocation leaves no trace.

mod dedupe;
mod fetch;
mod progress;
mod retry;
mod solved;
mod submissions;
mod task;

pub use dedupe::dedupe_consecutive;
pub use fetch::{ProgressFetcher, SubmissionFetcher};
pub use progress::{
    PROGRESS_COMPLETE, ProgressReceiver, ProgressSender, ProgressTracker, progress_channel,
    threshold_progress,
};
pub use retry::{ExponentialBackoff, NoRetry, RetryPolicy, Retrying};
pub use solved::{DEFAULT_PROGRESS_PAGE_SIZE, SolvedPages, SolvedSync, sync_solved};
pub use submissions::{DEFAULT_SUBMISSIONS_PAGE_SIZE, SubmissionSync, sync_submissions};
pub use task::{SyncTask, spawn_solved_sync, spawn_submission_sync};
