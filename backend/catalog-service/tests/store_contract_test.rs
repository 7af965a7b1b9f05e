// Tests for how the engine drives the record store contract
//
// A mocked store records the arguments the engine passes and injects
// failures the in-memory store cannot produce.

mod common;

use async_trait::async_trait;
use catalog_service::ranking::{Direction, OrderSpec, RecordFilter, SortField, SortKey};
use catalog_service::{CatalogError, CatalogService, Cursor, MediaRecord, PageRequest, RecordStore, SortStrategy};
use common::video;
use mockall::mock;
use mockall::predicate::*;
use std::sync::Arc;

mock! {
    pub Store {}

    #[async_trait]
    impl RecordStore for Store {
        async fn query(
            &self,
            filter: &RecordFilter,
            order: &OrderSpec,
            after: Option<SortKey>,
            limit: usize,
        ) -> anyhow::Result<Vec<MediaRecord>>;
        async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<MediaRecord>>;
    }
}

fn service(store: MockStore) -> CatalogService {
    common::init_tracing();
    CatalogService::new(Arc::new(store))
}

#[tokio::test]
async fn test_engine_passes_order_boundary_and_lookahead() {
    let mut store = MockStore::new();
    store
        .expect_query()
        .withf(|filter, order, after, limit| {
            filter.keyword.term() == Some("shoe")
                && filter.owner_id.is_none()
                && *order
                    == OrderSpec {
                        primary: SortField::LikeCount,
                        direction: Direction::Descending,
                        tie_break: Some(SortField::Id),
                    }
                && *after == Some(SortKey { primary: 5, tie_break: 42 })
                && *limit == 4
        })
        .times(1)
        .returning(|_, _, _, _| Ok(vec![video(41, 0, 5), video(40, 0, 4)]));

    let cursor = Cursor::after(&video(42, 0, 5), SortStrategy::Likes);
    let page = service(store)
        .fetch_page(
            &PageRequest::new(3)
                .keyword("Shoe")
                .sort("likes")
                .cursor(cursor.token()),
        )
        .await
        .unwrap();

    assert_eq!(page.ids(), vec![41, 40]);
    assert!(!page.has_next());
}

#[tokio::test]
async fn test_invalid_limit_never_touches_store() {
    let mut store = MockStore::new();
    store.expect_query().times(0);

    let service = service(store);
    for limit in [0, -1] {
        let err = service
            .fetch_page(&PageRequest::new(limit).sort("hits"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidLimit { .. }));
    }
}

#[tokio::test]
async fn test_malformed_cursor_never_touches_store() {
    let mut store = MockStore::new();
    store.expect_query().times(0);

    let err = service(store)
        .fetch_page(&PageRequest::new(10).cursor("%%%"))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::MalformedCursor(_)));
}

#[tokio::test]
async fn test_store_failure_propagates_without_retry() {
    let mut store = MockStore::new();
    store
        .expect_query()
        .times(1)
        .returning(|_, _, _, _| Err(anyhow::anyhow!("connection reset by peer")));

    let err = service(store)
        .fetch_page(&PageRequest::new(10).sort("hits"))
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::Store(_)));
    assert!(!err.is_client_error());
    assert!(err.to_string().contains("connection reset by peer"));
}

#[tokio::test]
async fn test_top_n_failure_returns_no_partial_result() {
    let mut store = MockStore::new();
    store
        .expect_query()
        .with(always(), always(), eq(None), eq(10))
        .times(1)
        .returning(|_, _, _, _| Err(anyhow::anyhow!("statement timeout")));

    let result = service(store).top_n(Some("hits"), 10).await;
    assert!(matches!(result, Err(CatalogError::Store(_))));
}

#[tokio::test]
async fn test_top_n_asks_for_exactly_n_rows() {
    let mut store = MockStore::new();
    store
        .expect_query()
        .with(always(), always(), eq(None), eq(3))
        .times(1)
        .returning(|_, _, _, _| Ok(vec![video(9, 30, 0), video(8, 20, 0), video(7, 10, 0)]));

    let top = service(store).top_n(Some("hits"), 3).await.unwrap();
    assert_eq!(top.iter().map(|r| r.id).collect::<Vec<_>>(), vec![9, 8, 7]);
}

#[tokio::test]
async fn test_top_n_ignores_keyword_and_cursor() {
    let mut store = MockStore::new();
    store
        .expect_query()
        .withf(|filter, _, after, _| *filter == RecordFilter::all() && after.is_none())
        .times(1)
        .returning(|_, _, _, _| Ok(vec![video(3, 9, 0)]));

    let top = service(store).top_n(Some("hits"), 5).await.unwrap();
    assert_eq!(top.len(), 1);
}

#[tokio::test]
async fn test_resume_lookup_failure_propagates() {
    let mut store = MockStore::new();
    store
        .expect_find_by_id()
        .with(eq(7))
        .times(1)
        .returning(|_| Err(anyhow::anyhow!("pool timed out")));

    let err = service(store)
        .cursor_after_id(7, Some("hits"))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Store(_)));
}

#[tokio::test]
async fn test_recency_resume_skips_store_lookup() {
    let mut store = MockStore::new();
    store.expect_find_by_id().times(0);

    let service = service(store);
    let cursor = service.cursor_after_id(7, Some("shoe")).await.unwrap();
    assert_eq!(cursor, Cursor::Recency { id: 7 });

    let err = service.cursor_after_id(-1, None).await.unwrap_err();
    assert!(matches!(err, CatalogError::MalformedCursor(_)));
}

#[tokio::test]
async fn test_liked_listing_passes_member_restriction() {
    let mut store = MockStore::new();
    store
        .expect_query()
        .withf(|filter, order, after, limit| {
            filter.liked_by == Some(42)
                && filter.owner_id.is_none()
                && filter.keyword.term().is_none()
                && order.primary == SortField::Id
                && *after == Some(SortKey { primary: 5, tie_break: 5 })
                && *limit == 3
        })
        .times(1)
        .returning(|_, _, _, _| Ok(vec![video(4, 0, 0)]));

    let token = Cursor::Recency { id: 5 }.token();
    let page = service(store)
        .list_liked_by(42, Some(&token), 2)
        .await
        .unwrap();
    assert_eq!(page.ids(), vec![4]);
}
