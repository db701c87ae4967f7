//! Retry policies for page fetchers
//!
//! The sync loops themselves never retry: a fetch error is fatal for the
//! invocation. Wrapping a fetcher in [`Retrying`] adds retries below the
//! loop without changing it.
//!
//! The wait between attempts watches the invocation's cancellation token,
//! so a cancelled sync does not sit out a full backoff delay.

use std::time::{Duration, Instant};

use log::{info, warn};
use tokio_util::sync::CancellationToken;

use super::fetch::{ProgressFetcher, SubmissionFetcher};
use crate::error::SyncError;
use crate::models::{Cursor, NumberedPage, Page};

/// Longest single sleep while waiting out a backoff delay
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Decides whether a failed fetch is attempted again
pub trait RetryPolicy: Send + Sync {
    /// Delay before the next attempt, or `None` to give up
    ///
    /// `attempt` is the zero-based number of the attempt that just failed.
    fn retry_delay(&self, attempt: u32, error: &SyncError) -> Option<Duration>;
}

/// Fail on the first error
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRetry;

impl RetryPolicy for NoRetry {
    fn retry_delay(&self, _attempt: u32, _error: &SyncError) -> Option<Duration> {
        None
    }
}

/// Exponential backoff with jitter, transport errors only
///
/// Decode errors are never retried: the same body would fail again.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub max_jitter: Duration,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            max_jitter: Duration::from_millis(100),
        }
    }
}

impl ExponentialBackoff {
    /// Delay without jitter for a given attempt
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}

impl RetryPolicy for ExponentialBackoff {
    fn retry_delay(&self, attempt: u32, error: &SyncError) -> Option<Duration> {
        if !error.is_transport() || attempt >= self.max_retries {
            return None;
        }
        Some(self.base_delay(attempt) + rand_jitter(self.max_jitter))
    }
}

/// Fetcher wrapper that retries failed calls according to a policy
pub struct Retrying<F, P> {
    inner: F,
    policy: P,
    cancel: CancellationToken,
}

impl<F, P: RetryPolicy> Retrying<F, P> {
    pub fn new(inner: F, policy: P) -> Self {
        Self {
            inner,
            policy,
            cancel: CancellationToken::new(),
        }
    }

    /// Give up waiting between attempts once `cancel` is tripped
    ///
    /// Pass the same token as the sync request.
    pub fn cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    fn run<T>(&self, what: &str, mut call: impl FnMut() -> Result<T, SyncError>) -> Result<T, SyncError> {
        let mut attempt = 0;
        loop {
            match call() {
                Ok(value) => return Ok(value),
                Err(e) => match self.policy.retry_delay(attempt, &e) {
                    Some(delay) => {
                        warn!(
                            "Fetching {} failed (attempt {}): {}; retrying in {:?}",
                            what,
                            attempt + 1,
                            e,
                            delay
                        );
                        if !self.wait(delay) {
                            info!("Retry of {} abandoned: sync cancelled", what);
                            return Err(SyncError::Cancelled);
                        }
                        attempt += 1;
                    }
                    None => return Err(e),
                },
            }
        }
    }

    /// Sleep for `delay` in short slices; false if cancelled first
    fn wait(&self, delay: Duration) -> bool {
        let deadline = Instant::now() + delay;
        loop {
            if self.cancel.is_cancelled() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            std::thread::sleep((deadline - now).min(CANCEL_POLL_INTERVAL));
        }
    }
}

impl<F: SubmissionFetcher, P: RetryPolicy> SubmissionFetcher for Retrying<F, P> {
    fn fetch_submissions(&self, cursor: &Cursor, page_size: usize) -> Result<Page, SyncError> {
        self.run("submissions", || self.inner.fetch_submissions(cursor, page_size))
    }
}

impl<F: ProgressFetcher, P: RetryPolicy> ProgressFetcher for Retrying<F, P> {
    fn fetch_progress(&self, wire_page: u32, page_size: usize) -> Result<NumberedPage, SyncError> {
        self.run("progress list", || self.inner.fetch_progress(wire_page, page_size))
    }
}

/// Random jitter in `[0, max)`
fn rand_jitter(max: Duration) -> Duration {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let max_ms = max.as_millis() as u64;
    if max_ms == 0 {
        return Duration::ZERO;
    }
    let hasher = RandomState::new().build_hasher();
    Duration::from_millis(hasher.finish() % max_ms)
}
