//! Forward-only traversal over fetched pages
//!
//! [`PageIterator`] walks one page's records; [`CompositeIterator`] chains a
//! slice of pages into one stream without flattening them into a single
//! buffer. Both borrow the pages read-only and are single-pass: walk again by
//! building a new iterator from the same pages.

mod composite;
mod page;

pub use composite::CompositeIterator;
pub use page::PageIterator;

use crate::error::ExhaustedError;
use crate::models::{NumberedPage, Page, Record};

/// Single-pass, forward-only traversal
pub trait RecordIterator {
    type Item;

    /// Whether `next()` would return an item
    fn has_next(&self) -> bool;

    /// Advance and return the next item, or `ExhaustedError` when none is left
    fn next(&mut self) -> Result<Self::Item, ExhaustedError>;

    /// Adapt into a std [`Iterator`]
    fn into_records(self) -> Records<Self>
    where
        Self: Sized,
    {
        Records(self)
    }
}

/// Std iterator adapter returned by [`RecordIterator::into_records`]
pub struct Records<I>(I);

impl<I: RecordIterator> Iterator for Records<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        RecordIterator::next(&mut self.0).ok()
    }
}

/// Something that can hand out an iterator over its contents
pub trait Aggregate {
    type Iter<'a>: RecordIterator
    where
        Self: 'a;

    fn create_iterator(&self) -> Self::Iter<'_>;
}

/// A page of items the composite iterator can descend into
pub trait Paged {
    type Item;

    fn items(&self) -> &[Self::Item];
}

impl Paged for Page {
    type Item = Record;

    fn items(&self) -> &[Record] {
        &self.records
    }
}

impl Paged for NumberedPage {
    type Item = Record;

    fn items(&self) -> &[Record] {
        &self.records
    }
}

impl<T> Paged for Vec<T> {
    type Item = T;

    fn items(&self) -> &[T] {
        self
    }
}

impl Aggregate for Page {
    type Iter<'a> = PageIterator<'a, Record>;

    fn create_iterator(&self) -> PageIterator<'_, Record> {
        PageIterator::new(&self.records)
    }
}

impl Aggregate for NumberedPage {
    type Iter<'a> = PageIterator<'a, Record>;

    fn create_iterator(&self) -> PageIterator<'_, Record> {
        PageIterator::new(&self.records)
    }
}
