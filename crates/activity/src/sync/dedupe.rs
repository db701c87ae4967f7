//! Consecutive-record deduplication

use crate::models::Identifiable;

/// Collapse runs of adjacent records sharing a grouping key
///
/// The first record of each run is kept. Non-adjacent repeats survive: the
/// service returns every attempt at a problem back to back, and only those
/// runs are merged.
pub fn dedupe_consecutive<T: Identifiable>(mut records: Vec<T>) -> Vec<T> {
    records.dedup_by(|later, kept| later.grouping_key() == kept.grouping_key());
    records
}
