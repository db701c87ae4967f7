//! Page and cursor types returned by the fetchers

use serde::{Deserialize, Serialize};

use super::Record;

/// Server-side position in the submissions dump
///
/// `offset` counts raw records already returned by the service. `last_key`
/// is the opaque continuation token from the most recent response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub offset: usize,
    pub last_key: Option<String>,
}

impl Cursor {
    /// Sentinel value for the first call
    pub fn start() -> Self {
        Self::default()
    }

    pub fn is_start(&self) -> bool {
        self.offset == 0 && self.last_key.is_none()
    }

    /// Position after consuming `raw_count` records from a response that
    /// declared `next_key` as its continuation
    pub fn advanced(&self, raw_count: usize, next_key: Option<String>) -> Self {
        Self {
            offset: self.offset + raw_count,
            last_key: next_key,
        }
    }
}

/// One cursor-style response: records in service order plus continuation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub records: Vec<Record>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl Page {
    pub fn new(records: Vec<Record>, next_cursor: Option<String>, has_more: bool) -> Self {
        Self {
            records,
            next_cursor,
            has_more,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One page-number-style response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberedPage {
    pub records: Vec<Record>,
    /// Page number as reported back by the service
    pub page_number: u32,
    /// Declared total number of pages
    pub total_pages: u32,
    /// Declared total number of records across all pages
    pub total_records: u32,
}

impl NumberedPage {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
