//! Cached catalog search.
//!
//! [`SearchService`] answers free-text product searches over the catalog
//! stored in a key-value namespace. Results are cached per request in the
//! same namespace through a [`catalog_cache::CacheLayer`], so repeated
//! searches skip scoring entirely.
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_service::{CatalogConfig, SearchRequest, SearchService};
//!
//! let config = CatalogConfig::discover(&std::env::current_dir()?)?.with_env();
//! let service = SearchService::from_config(&config)?;
//!
//! let result = service.search(&SearchRequest::new("hex bolt")).await?;
//! println!("{} of {} results (cached: {})", result.results.len(), result.total, result.cached);
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod request;
pub mod result;
pub mod sample;
pub mod service;

pub use config::{Backend, CatalogConfig, SearchConfig};
pub use error::{CatalogError, ErrorCategory, Result};
pub use metrics::MetricsSnapshot;
pub use request::SearchRequest;
pub use result::{SearchResult, CACHE_CONTROL};
pub use service::{ManageAction, ManageOutcome, SearchService, CATALOG_TTL_SECS, PRODUCTS_KEY};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        CatalogConfig, CatalogError, ManageAction, SearchRequest, SearchResult, SearchService,
    };
}
