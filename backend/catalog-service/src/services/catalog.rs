/// Catalog service - keyset pagination and top-N ranking over catalog videos
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::config::PaginationConfig;
use crate::error::{CatalogError, Result};
use crate::metrics::{
    CATALOG_PAGE_ITEMS, CATALOG_REQUEST_DURATION_SECONDS, CATALOG_REQUEST_ERRORS_TOTAL,
    CATALOG_REQUEST_TOTAL,
};
use crate::models::{MediaRecord, Page};
use crate::ranking::{Cursor, RecordFilter, SortKey, SortStrategy};
use crate::store::RecordStore;

const OP_PAGE: &str = "page";
const OP_OWNER_PAGE: &str = "owner_page";
const OP_LIKED_PAGE: &str = "liked_page";
const OP_TOP_N: &str = "top_n";
const OP_RESUME: &str = "resume";

/// Arguments of a keyword listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Search term; blank or missing lists everything.
    pub keyword: Option<String>,
    /// `"hits"`, `"likes"`, anything else means recency.
    pub sort: Option<String>,
    /// Token from the previous page's `next_cursor`.
    pub cursor: Option<String>,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(limit: i64) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Same request, continuing after `page`.
    pub fn next(&self, page: &Page) -> Option<Self> {
        let cursor = page.next_cursor.as_ref()?;
        Some(Self {
            cursor: Some(cursor.token()),
            ..self.clone()
        })
    }
}

/// Stateless pagination engine. Clones share the underlying store.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn RecordStore>,
    limits: PaginationConfig,
}

impl CatalogService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self::with_config(store, PaginationConfig::default())
    }

    pub fn with_config(store: Arc<dyn RecordStore>, limits: PaginationConfig) -> Self {
        Self { store, limits }
    }

    pub fn limits(&self) -> &PaginationConfig {
        &self.limits
    }

    /// List one page of records matching the keyword, ordered by the
    /// requested strategy and continuing after the request's cursor.
    ///
    /// `next_cursor` is set only when at least one more record follows the
    /// page; a short page never carries one.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch_page(&self, request: &PageRequest) -> Result<Page> {
        let result = self
            .page(
                OP_PAGE,
                request.sort.as_deref(),
                RecordFilter::keyword(request.keyword.as_deref()),
                request.cursor.as_deref(),
                request.limit,
            )
            .await;
        observe(OP_PAGE, result)
    }

    /// A member's uploads, newest first.
    #[instrument(level = "debug", skip(self))]
    pub async fn list_by_owner(
        &self,
        owner_id: i64,
        cursor: Option<&str>,
        limit: i64,
    ) -> Result<Page> {
        let result = self
            .page(
                OP_OWNER_PAGE,
                None,
                RecordFilter::owner(owner_id),
                cursor,
                limit,
            )
            .await;
        observe(OP_OWNER_PAGE, result)
    }

    /// Videos a member has liked, newest first.
    #[instrument(level = "debug", skip(self))]
    pub async fn list_liked_by(
        &self,
        member_id: i64,
        cursor: Option<&str>,
        limit: i64,
    ) -> Result<Page> {
        let result = self
            .page(
                OP_LIKED_PAGE,
                None,
                RecordFilter::liked_by(member_id),
                cursor,
                limit,
            )
            .await;
        observe(OP_LIKED_PAGE, result)
    }

    /// First `n` records under the resolved strategy, with no keyword or
    /// cursor. `Cursor::after` on the last item continues via `fetch_page`.
    #[instrument(level = "debug", skip(self))]
    pub async fn top_n(&self, sort: Option<&str>, n: i64) -> Result<Vec<MediaRecord>> {
        let strategy = SortStrategy::from_token(sort);
        count_request(OP_TOP_N, strategy);
        let result = match self.validate_limit(n) {
            Ok(n) => {
                self.fetch(OP_TOP_N, strategy, &RecordFilter::all(), None, n)
                    .await
            }
            Err(e) => Err(e),
        };
        observe(OP_TOP_N, result)
    }

    /// Top view sized by `pagination.top_n_default`.
    pub async fn top_n_default(&self, sort: Option<&str>) -> Result<Vec<MediaRecord>> {
        self.top_n(sort, self.limits.top_n_default).await
    }

    /// Build a cursor from a bare "last id seen", the form older clients
    /// send. Recency needs only the id, so it resumes even after the record
    /// was deleted. Count strategies resume after the record's current count.
    #[instrument(level = "debug", skip(self))]
    pub async fn cursor_after_id(&self, id: i64, sort: Option<&str>) -> Result<Cursor> {
        let strategy = SortStrategy::from_token(sort);
        count_request(OP_RESUME, strategy);
        let result = match strategy {
            SortStrategy::Recency if id < 0 => Err(CatalogError::MalformedCursor(format!(
                "negative record id {}",
                id
            ))),
            SortStrategy::Recency => Ok(Cursor::Recency { id }),
            SortStrategy::Views | SortStrategy::Likes => match self.store.find_by_id(id).await {
                Ok(Some(record)) => Ok(Cursor::after(&record, strategy)),
                Ok(None) => Err(CatalogError::RecordNotFound(id)),
                Err(e) => Err(CatalogError::Store(e)),
            },
        };
        observe(OP_RESUME, result)
    }

    async fn page(
        &self,
        operation: &'static str,
        sort: Option<&str>,
        filter: RecordFilter,
        cursor: Option<&str>,
        limit: i64,
    ) -> Result<Page> {
        let strategy = SortStrategy::from_token(sort);
        count_request(operation, strategy);

        let limit = self.validate_limit(limit)?;
        let cursor = cursor
            .map(|token| Cursor::decode(token, strategy))
            .transpose()?;
        let boundary = cursor.as_ref().map(Cursor::boundary);

        // One extra row tells a full final page apart from a full middle one.
        let mut items = self
            .fetch(operation, strategy, &filter, boundary, limit + 1)
            .await?;
        let has_more = items.len() > limit;
        items.truncate(limit);

        let next_cursor = if has_more {
            items.last().map(|last| Cursor::after(last, strategy))
        } else {
            None
        };

        CATALOG_PAGE_ITEMS.observe(items.len() as f64);
        debug!(
            operation,
            strategy = %strategy,
            returned = items.len(),
            has_next = next_cursor.is_some(),
            "catalog page served"
        );

        Ok(Page { items, next_cursor })
    }

    async fn fetch(
        &self,
        operation: &'static str,
        strategy: SortStrategy,
        filter: &RecordFilter,
        after: Option<SortKey>,
        limit: usize,
    ) -> Result<Vec<MediaRecord>> {
        let timer = CATALOG_REQUEST_DURATION_SECONDS
            .with_label_values(&[operation])
            .start_timer();
        let items = self
            .store
            .query(filter, &strategy.order_spec(), after, limit)
            .await?;
        timer.observe_duration();
        Ok(items)
    }

    fn validate_limit(&self, limit: i64) -> Result<usize> {
        let max = self.limits.max_page_size;
        if limit <= 0 || limit > max {
            return Err(CatalogError::InvalidLimit { limit, max });
        }
        usize::try_from(limit).map_err(|_| CatalogError::InvalidLimit { limit, max })
    }
}

fn count_request(operation: &str, strategy: SortStrategy) {
    CATALOG_REQUEST_TOTAL
        .with_label_values(&[operation, strategy.token()])
        .inc();
}

fn observe<T>(operation: &str, result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        CATALOG_REQUEST_ERRORS_TOTAL
            .with_label_values(&[operation, err.kind()])
            .inc();
        if err.is_client_error() {
            debug!(operation, error = %err, "catalog request rejected");
        } else {
            warn!(operation, error = %err, "catalog request failed");
        }
    }
    result
}
