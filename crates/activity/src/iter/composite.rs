//! Iterator chaining several pages into one stream

use super::{PageIterator, Paged, RecordIterator};
use crate::error::ExhaustedError;

/// Walks a slice of pages in page order, then intra-page order
///
/// State is the index of the current page plus an iterator over that page.
/// Empty pages are skipped eagerly, so `has_next()` is a plain check on the
/// current page iterator.
pub struct CompositeIterator<'a, P: Paged>
where
    P::Item: 'a,
{
    pages: &'a [P],
    page_index: usize,
    current: PageIterator<'a, P::Item>,
}

impl<'a, P: Paged> CompositeIterator<'a, P>
where
    P::Item: 'a,
{
    pub fn new(pages: &'a [P]) -> Self {
        let current = PageIterator::new(pages.first().map(Paged::items).unwrap_or(&[]));
        let mut iter = Self {
            pages,
            page_index: 0,
            current,
        };
        iter.skip_exhausted_pages();
        iter
    }

    /// Index of the page the next item comes from
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Move forward until the current page has an item or no pages remain
    fn skip_exhausted_pages(&mut self) {
        while !self.current.has_next() && self.page_index + 1 < self.pages.len() {
            self.page_index += 1;
            self.current = PageIterator::new(self.pages[self.page_index].items());
        }
    }
}

impl<'a, P: Paged> RecordIterator for CompositeIterator<'a, P>
where
    P::Item: 'a,
{
    type Item = &'a P::Item;

    fn has_next(&self) -> bool {
        self.current.has_next()
    }

    fn next(&mut self) -> Result<&'a P::Item, ExhaustedError> {
        let item = self.current.next()?;
        self.skip_exhausted_pages();
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_3_0_2_yield_five_in_order() {
        let pages = vec![vec!['a', 'b', 'c'], vec![], vec!['d', 'e']];
        let mut iter = CompositeIterator::new(&pages);

        let mut seen = Vec::new();
        while iter.has_next() {
            seen.push(*iter.next().unwrap());
        }

        assert_eq!(seen, vec!['a', 'b', 'c', 'd', 'e']);
        assert!(!iter.has_next());
        assert_eq!(iter.next(), Err(ExhaustedError));
    }

    #[test]
    fn test_has_next_false_only_after_last() {
        let pages = vec![vec![1, 2, 3], vec![], vec![4, 5]];
        let mut iter = CompositeIterator::new(&pages);

        for consumed in 1..=5 {
            assert!(iter.has_next(), "has_next false after {} items", consumed - 1);
            iter.next().unwrap();
        }
        assert!(!iter.has_next());
    }

    #[test]
    fn test_no_pages() {
        let pages: Vec<Vec<u32>> = Vec::new();
        let mut iter = CompositeIterator::new(&pages);
        assert!(!iter.has_next());
        assert_eq!(iter.next(), Err(ExhaustedError));
    }

    #[test]
    fn test_all_pages_empty() {
        let pages: Vec<Vec<u32>> = vec![vec![], vec![], vec![]];
        let iter = CompositeIterator::new(&pages);
        assert!(!iter.has_next());
        assert_eq!(iter.page_index(), 2);
    }

    #[test]
    fn test_leading_empty_pages_are_skipped() {
        let pages = vec![vec![], vec![], vec![7]];
        let mut iter = CompositeIterator::new(&pages);
        assert!(iter.has_next());
        assert_eq!(iter.page_index(), 2);
        assert_eq!(iter.next(), Ok(&7));
        assert!(!iter.has_next());
    }

    #[test]
    fn test_restart_by_rebuilding() {
        let pages = vec![vec![1], vec![2]];
        let first: Vec<i32> = CompositeIterator::new(&pages).into_records().copied().collect();
        let second: Vec<i32> = CompositeIterator::new(&pages).into_records().copied().collect();
        assert_eq!(first, vec![1, 2]);
        assert_eq!(first, second);
    }
}
