//! Ordering, continuation and filtering rules shared by every listing.
pub mod cursor;
pub mod keyword;
pub mod strategy;

pub use cursor::Cursor;
pub use keyword::{KeywordFilter, RecordFilter};
pub use strategy::{Direction, OrderSpec, SortField, SortKey, SortStrategy};
