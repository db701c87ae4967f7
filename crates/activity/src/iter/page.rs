//! Iterator over a single page

use super::RecordIterator;
use crate::error::ExhaustedError;

/// Forward-only iterator over one page's records
#[derive(Debug, Clone)]
pub struct PageIterator<'a, T> {
    items: &'a [T],
    /// Index of the next item to serve
    position: usize,
}

impl<'a, T> PageIterator<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        Self { items, position: 0 }
    }

    /// Items not yet served
    pub fn remaining(&self) -> usize {
        self.items.len() - self.position
    }
}

impl<'a, T> RecordIterator for PageIterator<'a, T> {
    type Item = &'a T;

    fn has_next(&self) -> bool {
        self.position < self.items.len()
    }

    fn next(&mut self) -> Result<&'a T, ExhaustedError> {
        let item = self.items.get(self.position).ok_or(ExhaustedError)?;
        self.position += 1;
        Ok(item)
    }
}
