/// Configuration management for Catalog Service
///
/// This module handles loading configuration from environment variables.
use serde::{Deserialize, Serialize};

/// Main catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Database configuration
    pub database: DatabaseConfig,
    /// Page size limits
    pub pagination: PaginationConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
    /// How long a query waits for a pooled connection
    pub acquire_timeout_ms: u64,
}

/// Page size limits applied by the pagination engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size the serving layer should use when the caller omits one
    pub default_page_size: i64,
    /// Largest accepted page size or top-N count
    pub max_page_size: i64,
    /// Number of records in the ranked "top" view
    pub top_n_default: i64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
            top_n_default: 10,
        }
    }
}

impl PaginationConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.default_page_size <= 0 || self.max_page_size <= 0 || self.top_n_default <= 0 {
            return Err("Page sizes must be positive".to_string());
        }
        if self.default_page_size > self.max_page_size {
            return Err(format!(
                "CATALOG_DEFAULT_PAGE_SIZE ({}) cannot exceed CATALOG_MAX_PAGE_SIZE ({})",
                self.default_page_size, self.max_page_size
            ));
        }
        if self.top_n_default > self.max_page_size {
            return Err(format!(
                "CATALOG_TOP_N_DEFAULT ({}) cannot exceed CATALOG_MAX_PAGE_SIZE ({})",
                self.top_n_default, self.max_page_size
            ));
        }
        Ok(())
    }
}

impl CatalogConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let defaults = PaginationConfig::default();

        let pagination = PaginationConfig {
            default_page_size: parse_env_or_default(
                "CATALOG_DEFAULT_PAGE_SIZE",
                defaults.default_page_size,
            )?,
            max_page_size: parse_env_or_default("CATALOG_MAX_PAGE_SIZE", defaults.max_page_size)?,
            top_n_default: parse_env_or_default("CATALOG_TOP_N_DEFAULT", defaults.top_n_default)?,
        };
        pagination.validate()?;

        Ok(CatalogConfig {
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/nova".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
                acquire_timeout_ms: std::env::var("DATABASE_ACQUIRE_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(3_000),
            },
            pagination,
        })
    }
}

fn parse_env_or_default(key: &str, default: i64) -> Result<i64, String> {
    match std::env::var(key) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pagination_is_valid() {
        let config = PaginationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.top_n_default, 10);
    }

    #[test]
    fn test_pagination_validation() {
        let zero = PaginationConfig {
            default_page_size: 0,
            ..PaginationConfig::default()
        };
        assert!(zero.validate().is_err());

        let default_too_large = PaginationConfig {
            default_page_size: 200,
            max_page_size: 100,
            top_n_default: 10,
        };
        assert!(default_too_large.validate().is_err());

        let top_too_large = PaginationConfig {
            default_page_size: 20,
            max_page_size: 50,
            top_n_default: 51,
        };
        assert!(top_too_large.validate().is_err());
    }
}
