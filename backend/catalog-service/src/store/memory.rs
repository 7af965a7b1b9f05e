//! In-memory record store.
//!
//! Reference adapter used by fixtures and tests. The write helpers stand in
//! for the services that own view counters, like counters and the
//! member/video like relation.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::RecordStore;
use crate::models::MediaRecord;
use crate::ranking::{Direction, OrderSpec, RecordFilter, SortField, SortKey};

#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    records: Arc<RwLock<BTreeMap<i64, MediaRecord>>>,
    /// `(member_id, video_id)` pairs.
    likes: Arc<RwLock<BTreeSet<(i64, i64)>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = MediaRecord>) -> Self {
        let map = records.into_iter().map(|r| (r.id, r)).collect();
        Self {
            records: Arc::new(RwLock::new(map)),
            likes: Arc::default(),
        }
    }

    /// Insert or replace a record.
    pub async fn insert(&self, record: MediaRecord) {
        self.records.write().await.insert(record.id, record);
    }

    /// Remove a record together with the likes that point at it.
    pub async fn remove(&self, id: i64) -> Option<MediaRecord> {
        let removed = self.records.write().await.remove(&id);
        self.likes.write().await.retain(|&(_, video_id)| video_id != id);
        removed
    }

    /// Record that `member_id` likes `video_id`. Returns false for unknown
    /// videos. Counters are left alone; `set_like_count` owns them.
    pub async fn add_like(&self, member_id: i64, video_id: i64) -> bool {
        if !self.records.read().await.contains_key(&video_id) {
            return false;
        }
        self.likes.write().await.insert((member_id, video_id));
        true
    }

    pub async fn remove_like(&self, member_id: i64, video_id: i64) -> bool {
        self.likes.write().await.remove(&(member_id, video_id))
    }

    async fn liked_ids(&self, member_id: i64) -> HashSet<i64> {
        self.likes
            .read()
            .await
            .range((member_id, i64::MIN)..=(member_id, i64::MAX))
            .map(|&(_, video_id)| video_id)
            .collect()
    }

    /// Increment the view counter, returning the new value.
    pub async fn record_view(&self, id: i64) -> Option<i64> {
        let mut records = self.records.write().await;
        let record = records.get_mut(&id)?;
        record.view_count += 1;
        Some(record.view_count)
    }

    /// Overwrite the like counter. Negative values are clamped to zero.
    pub async fn set_like_count(&self, id: i64, like_count: i64) -> Option<i64> {
        let mut records = self.records.write().await;
        let record = records.get_mut(&id)?;
        record.like_count = like_count.max(0);
        Some(record.like_count)
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn query(
        &self,
        filter: &RecordFilter,
        order: &OrderSpec,
        after: Option<SortKey>,
        limit: usize,
    ) -> anyhow::Result<Vec<MediaRecord>> {
        let liked = match filter.liked_by {
            Some(member_id) => Some(self.liked_ids(member_id).await),
            None => None,
        };
        let selected = |r: &MediaRecord| {
            filter.matches(r) && liked.as_ref().map_or(true, |ids| ids.contains(&r.id))
        };
        let records = self.records.read().await;

        // Newest-first walks the id index directly, like a keyset scan.
        if order.primary == SortField::Id && order.direction == Direction::Descending {
            let range = match after {
                Some(boundary) => records.range(..boundary.primary),
                None => records.range(..),
            };
            return Ok(range
                .rev()
                .map(|(_, r)| r)
                .filter(|r| selected(*r))
                .take(limit)
                .cloned()
                .collect());
        }

        let mut batch: Vec<MediaRecord> = records
            .values()
            .filter(|r| selected(*r))
            .filter(|r| after.map_or(true, |b| order.is_after(&order.key_of(r), &b)))
            .cloned()
            .collect();
        batch.sort_by(|a, b| order.compare_records(a, b));
        batch.truncate(limit);
        Ok(batch)
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<MediaRecord>> {
        Ok(self.records.read().await.get(&id).cloned())
    }
}
