/// Data models for catalog-service
///
/// - MediaRecord: read-model projection of a catalog video
/// - Page: one slice of a keyset-paginated listing
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ranking::Cursor;

/// Catalog video as seen by the ranking engine.
///
/// `view_count` and `like_count` are written by other services; they are
/// read here and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MediaRecord {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub view_count: i64,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
}

/// One page of results plus the continuation cursor, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub items: Vec<MediaRecord>,
    pub next_cursor: Option<Cursor>,
}

impl Page {
    pub fn has_next(&self) -> bool {
        self.next_cursor.is_some()
    }

    pub fn ids(&self) -> Vec<i64> {
        self.items.iter().map(|r| r.id).collect()
    }
}
