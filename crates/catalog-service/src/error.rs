//! Service error taxonomy.

use std::fmt;

use catalog_cache::CacheError;
use catalog_pool::PoolError;
use serde::Serialize;
use thiserror::Error;

/// Errors returned by [`crate::SearchService`].
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Bad caller input, e.g. an empty query.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required setting such as the store namespace is missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The catalog has not been populated.
    #[error("No product data available in the store")]
    NoData,

    /// The store failed in a way the cache layer could not absorb.
    #[error("Backend error: {0}")]
    Backend(String),

    /// No pool slot became free within the acquire timeout.
    #[error(transparent)]
    PoolExhausted(PoolError),

    /// A stored value could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Unknown catalog management action.
    #[error("Invalid action '{0}'. Use 'populate', 'clear', or 'status'")]
    InvalidAction(String),
}

/// Stable, caller-visible kind of a [`CatalogError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Validation,
    Config,
    NoData,
    Backend,
    PoolExhausted,
    Serialization,
    InvalidAction,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::Config => "config",
            ErrorCategory::NoData => "no_data",
            ErrorCategory::Backend => "backend",
            ErrorCategory::PoolExhausted => "pool_exhausted",
            ErrorCategory::Serialization => "serialization",
            ErrorCategory::InvalidAction => "invalid_action",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CatalogError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// The error's category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            CatalogError::Validation(_) => ErrorCategory::Validation,
            CatalogError::Config(_) => ErrorCategory::Config,
            CatalogError::NoData => ErrorCategory::NoData,
            CatalogError::Backend(_) => ErrorCategory::Backend,
            CatalogError::PoolExhausted(_) => ErrorCategory::PoolExhausted,
            CatalogError::Serialization(_) => ErrorCategory::Serialization,
            CatalogError::InvalidAction(_) => ErrorCategory::InvalidAction,
        }
    }

    /// HTTP status a front end should answer with.
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::InvalidAction => 400,
            ErrorCategory::PoolExhausted => 503,
            _ => 500,
        }
    }

    /// Whether the caller is at fault.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

impl From<PoolError> for CatalogError {
    fn from(err: PoolError) -> Self {
        match err {
            PoolError::Exhausted { .. } => CatalogError::PoolExhausted(err),
            PoolError::Closed => CatalogError::Backend(err.to_string()),
        }
    }
}

impl From<CacheError> for CatalogError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::Pool(e) => e.into(),
            CacheError::Serialization(e) => CatalogError::Serialization(e),
        }
    }
}

/// Result alias for service operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
