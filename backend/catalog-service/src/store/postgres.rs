//! PostgreSQL record store.
//!
//! Keyset SQL over the `videos` table. Composite orders use a row-value
//! comparison so `(view_count, id) < ($1, $2)` can walk the matching
//! descending index without an OFFSET.

use anyhow::Context;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Duration;
use tracing::{debug, info};

use super::RecordStore;
use crate::config::DatabaseConfig;
use crate::models::MediaRecord;
use crate::ranking::{Direction, OrderSpec, RecordFilter, SortKey};

const SELECT_COLUMNS: &str =
    "SELECT id, owner_id, title, description, view_count, like_count, created_at FROM videos";

#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Open a pool sized and timed from [`DatabaseConfig`].
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_millis(config.acquire_timeout_ms))
        .connect(&config.url)
        .await
}

/// Ensure the `videos` table and its keyset indexes exist.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    info!("Ensuring catalog tables exist");

    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }

    Ok(())
}

pub const SCHEMA: &[&str] = &[
    VIDEOS_TABLE,
    VIDEOS_VIEW_COUNT_INDEX,
    VIDEOS_LIKE_COUNT_INDEX,
    VIDEOS_OWNER_INDEX,
    VIDEO_LIKES_TABLE,
];

const VIDEOS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS videos (
    id BIGSERIAL PRIMARY KEY,
    owner_id BIGINT NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    view_count BIGINT NOT NULL DEFAULT 0 CHECK (view_count >= 0),
    like_count BIGINT NOT NULL DEFAULT 0 CHECK (like_count >= 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const VIDEOS_VIEW_COUNT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_videos_view_count_id ON videos (view_count DESC, id DESC)";

const VIDEOS_LIKE_COUNT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_videos_like_count_id ON videos (like_count DESC, id DESC)";

const VIDEOS_OWNER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_videos_owner_id_id ON videos (owner_id, id DESC)";

const VIDEO_LIKES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS video_likes (
    member_id BIGINT NOT NULL,
    video_id BIGINT NOT NULL REFERENCES videos (id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    PRIMARY KEY (member_id, video_id)
)
"#;

/// Build the keyset query for one batch.
pub(crate) fn build_query<'a>(
    filter: &'a RecordFilter,
    order: &OrderSpec,
    after: Option<SortKey>,
    limit: usize,
) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(SELECT_COLUMNS);
    qb.push(" WHERE TRUE");

    if let Some(owner_id) = filter.owner_id {
        qb.push(" AND owner_id = ").push_bind(owner_id);
    }

    if let Some(member_id) = filter.liked_by {
        qb.push(" AND EXISTS (SELECT 1 FROM video_likes l WHERE l.video_id = videos.id AND l.member_id = ")
            .push_bind(member_id)
            .push(")");
    }

    // Term is already lowercased; strpos avoids LIKE wildcard escaping.
    if let Some(term) = filter.keyword.term() {
        qb.push(" AND (strpos(lower(title), ")
            .push_bind(term)
            .push(") > 0 OR strpos(lower(description), ")
            .push_bind(term)
            .push(") > 0)");
    }

    let (cmp, dir) = match order.direction {
        Direction::Descending => ("<", "DESC"),
        Direction::Ascending => (">", "ASC"),
    };
    let primary = order.primary.column();

    if let Some(boundary) = after {
        match order.tie_break {
            Some(tie_break) => {
                qb.push(format!(" AND ({}, {}) {} (", primary, tie_break.column(), cmp))
                    .push_bind(boundary.primary)
                    .push(", ")
                    .push_bind(boundary.tie_break)
                    .push(")");
            }
            None => {
                qb.push(format!(" AND {} {} ", primary, cmp))
                    .push_bind(boundary.primary);
            }
        }
    }

    qb.push(format!(" ORDER BY {} {}", primary, dir));
    if let Some(tie_break) = order.tie_break {
        qb.push(format!(", {} {}", tie_break.column(), dir));
    }

    qb.push(" LIMIT ")
        .push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
    qb
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn query(
        &self,
        filter: &RecordFilter,
        order: &OrderSpec,
        after: Option<SortKey>,
        limit: usize,
    ) -> anyhow::Result<Vec<MediaRecord>> {
        let mut qb = build_query(filter, order, after, limit);
        debug!(sql = qb.sql(), "catalog keyset query");

        let records = qb
            .build_query_as::<MediaRecord>()
            .fetch_all(&self.pool)
            .await
            .context("Failed to query videos")?;

        Ok(records)
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<MediaRecord>> {
        let record = sqlx::query_as::<_, MediaRecord>(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to load video {}", id))?;

        Ok(record)
    }
}
