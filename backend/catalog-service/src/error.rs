/// Error types for Catalog Service
///
/// Unknown sort tokens are deliberately absent from this enum: they fall back
/// to recency ordering instead of failing the request.
use thiserror::Error;

/// Result type for catalog-service operations
pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// Page size or top-N count outside `1..=max`
    #[error("Invalid limit: {limit} (must be between 1 and {max})")]
    InvalidLimit { limit: i64, max: i64 },

    /// Cursor could not be decoded under the resolved sort strategy
    #[error("Malformed cursor: {0}")]
    MalformedCursor(String),

    /// Resume point referenced a record that does not exist
    #[error("Record not found: {0}")]
    RecordNotFound(i64),

    /// Record store failure, passed through untouched
    #[error("Store error: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl CatalogError {
    /// Whether the failure was caused by the caller's input rather than the
    /// backing store. Serving layers map these to 4xx responses.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, CatalogError::Store(_))
    }

    /// Short stable label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::InvalidLimit { .. } => "invalid_limit",
            CatalogError::MalformedCursor(_) => "malformed_cursor",
            CatalogError::RecordNotFound(_) => "record_not_found",
            CatalogError::Store(_) => "store",
        }
    }
}
