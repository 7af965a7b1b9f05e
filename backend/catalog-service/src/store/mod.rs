//! Record store contract.
//!
//! The ranking engine dictates the shape of this interface: a filtered,
//! ordered batch strictly past an exclusive boundary. Adapters own query
//! planning, timeouts and retries.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::models::MediaRecord;
use crate::ranking::{OrderSpec, RecordFilter, SortKey};

pub use memory::InMemoryRecordStore;
pub use postgres::PgRecordStore;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Up to `limit` records matching `filter`, ordered by `order`, each
    /// ranking strictly after `after` when a boundary is given.
    async fn query(
        &self,
        filter: &RecordFilter,
        order: &OrderSpec,
        after: Option<SortKey>,
        limit: usize,
    ) -> anyhow::Result<Vec<MediaRecord>>;

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<MediaRecord>>;
}
