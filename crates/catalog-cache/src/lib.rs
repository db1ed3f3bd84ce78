//! Two-tier TTL cache in front of the catalog key-value store.
//!
//! Provides a small async API over an [`ExternalStore`] (the hosted
//! key-value namespace) with a short-lived in-process tier in front of it.
//! Every store round-trip borrows a slot from a [`catalog_pool::ConnectionPool`].
//!
//! Store failures never escape this crate: reads degrade to `None` and
//! writes to `false`.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use catalog_cache::{CacheLayer, MemoryStore};
//! use catalog_pool::ConnectionPool;
//!
//! let cache = CacheLayer::new(Arc::new(MemoryStore::new()), ConnectionPool::new(10), "dev");
//!
//! cache.put("products_data", &payload, 86_400).await?;
//! let raw: Option<String> = cache.get("products_data").await?;
//! cache.delete("products_data").await?;
//! ```

mod error;
mod layer;
mod memory;
mod store;
mod wrangler;

pub use error::{CacheError, StoreError};
pub use layer::{CacheLayer, LOCAL_TTL};
pub use memory::{MemoryStore, StoreAccess};
pub use store::ExternalStore;
pub use wrangler::WranglerStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{CacheError, CacheLayer, ExternalStore, MemoryStore, StoreError, WranglerStore};
}
