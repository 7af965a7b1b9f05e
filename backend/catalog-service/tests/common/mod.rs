//! Shared fixtures for catalog-service integration tests.
#![allow(dead_code)]

use catalog_service::{CatalogService, InMemoryRecordStore, MediaRecord};
use chrono::{TimeZone, Utc};
use std::sync::Arc;

/// Install a test-writer subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_service=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

pub fn video(id: i64, view_count: i64, like_count: i64) -> MediaRecord {
    titled(id, view_count, like_count, &format!("video {}", id), "")
}

pub fn titled(
    id: i64,
    view_count: i64,
    like_count: i64,
    title: &str,
    description: &str,
) -> MediaRecord {
    MediaRecord {
        id,
        owner_id: 100 + id % 3,
        title: title.to_string(),
        description: description.to_string(),
        view_count,
        like_count,
        created_at: Utc.timestamp_opt(1_700_000_000 + id * 60, 0).unwrap(),
    }
}

pub fn service_with(records: Vec<MediaRecord>) -> (CatalogService, InMemoryRecordStore) {
    init_tracing();
    let store = InMemoryRecordStore::with_records(records);
    let service = CatalogService::new(Arc::new(store.clone()));
    (service, store)
}

/// Twelve uploads sharing the description term "공통", with a spread of
/// view and like counts containing several ties.
pub fn shared_term_catalog() -> Vec<MediaRecord> {
    vec![
        titled(1, 10, 1, "우르오스", "공통"),
        titled(2, 8, 2, "나이키", "공통"),
        titled(3, 8, 2, "범고래", "공통 나이키"),
        titled(4, 8, 3, "뉴발 992", "공통"),
        titled(5, 5, 3, "에어맥스", "공통 나이키"),
        titled(6, 5, 3, "아이폰", "공통"),
        titled(7, 5, 5, "알파바운스", "공통"),
        titled(8, 3, 5, "로퍼", "공통"),
        titled(9, 3, 5, "발렌시아가", "공통"),
        titled(10, 2, 8, "스피드러너", "공통 발렌시아가"),
        titled(11, 2, 8, "맥퀸", "공통"),
        titled(12, 1, 10, "골든구스", "공통"),
    ]
}
