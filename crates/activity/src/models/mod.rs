//! Domain models for activity records

mod page;
mod record;
mod sync_state;

pub use page::{Cursor, NumberedPage, Page};
pub use record::{
    Displayable, Identifiable, Record, RecordBuilder, RecordId, RecordKind, TitleSlug, time_ago,
};
pub use sync_state::SyncState;
