/// Catalog Service Library
///
/// Keyset-paginated listing, keyword search and ranked "top N" views over the
/// Nova media catalog. View and like counters are owned by other services and
/// change continuously; this crate only reads them and guarantees a stable,
/// reproducible order for every page it hands out.
///
/// # Modules
///
/// - `ranking`: Sort strategies, continuation cursors and the keyword filter
/// - `services`: The pagination engine and top-N ranker
/// - `store`: Record store contract plus in-memory and PostgreSQL adapters
/// - `models`: Catalog records and pages
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Observability and metrics collection
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod ranking;
pub mod services;
pub mod store;

pub use config::CatalogConfig;
pub use error::{CatalogError, Result};
pub use models::{MediaRecord, Page};
pub use ranking::{Cursor, KeywordFilter, OrderSpec, RecordFilter, SortKey, SortStrategy};
pub use services::{CatalogService, PageRequest};
pub use store::{InMemoryRecordStore, PgRecordStore, RecordStore};
