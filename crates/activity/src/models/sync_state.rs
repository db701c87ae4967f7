//! Per-invocation sync state

use serde::{Deserialize, Serialize};

use super::Cursor;

/// Mutable state of one sync invocation
///
/// Created at the start of a sync, mutated once per fetched page and handed
/// back (or dropped) when the loop terminates. Never shared between
/// invocations. `A` is whatever the loop accumulates: a flat record list for
/// the submission walk, whole pages for the progress walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncState<A> {
    /// Server-side position (submission walk)
    pub cursor: Cursor,
    /// Wire page number sent on the next request (progress walk)
    pub wire_page: u32,
    /// Caller-visible page counter: pages retained so far
    pub page_index: u32,
    /// Total page count, fixed by the first response
    pub total_pages: Option<u32>,
    /// Page number the service reported for the last retained page
    pub last_reported_page: Option<u32>,
    /// Accumulated results
    pub accumulated: A,
}

impl<A: Default> Default for SyncState<A> {
    fn default() -> Self {
        Self::new(A::default())
    }
}

impl<A> SyncState<A> {
    pub fn new(accumulated: A) -> Self {
        Self {
            cursor: Cursor::start(),
            wire_page: 0,
            page_index: 0,
            total_pages: None,
            last_reported_page: None,
            accumulated,
        }
    }

    /// Record the declared total page count
    ///
    /// Only the first call has an effect; later responses never revise it.
    pub fn learn_total_pages(&mut self, total: u32) -> u32 {
        *self.total_pages.get_or_insert(total)
    }

    /// Whether every declared page has been retained
    pub fn all_pages_retained(&self) -> bool {
        self.total_pages
            .is_some_and(|total| self.page_index >= total)
    }

    /// Percentage of declared pages retained, saturating at 100
    pub fn page_progress(&self) -> f64 {
        match self.total_pages {
            None => 0.0,
            Some(0) => 100.0,
            Some(total) if self.page_index >= total => 100.0,
            Some(total) => f64::from(self.page_index) / f64::from(total) * 100.0,
        }
    }

    pub fn into_accumulated(self) -> A {
        self.accumulated
    }
}
