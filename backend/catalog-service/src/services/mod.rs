/// Business logic layer for catalog-service
///
/// - Catalog service: keyset pagination, keyword search and top-N ranking
pub mod catalog;

pub use catalog::{CatalogService, PageRequest};
