//! Bounded connection pool for the catalog store.
//!
//! This crate provides:
//! - `ConnectionPool` - Caps concurrent store access, queues excess callers FIFO
//! - `PooledConnection` - Borrowed slot, returned on `release()` or drop
//! - `PoolStats` - Point-in-time view of pool occupancy
//!
//! # Example
//!
//! ```ignore
//! use catalog_pool::ConnectionPool;
//!
//! let pool = ConnectionPool::new(10);
//! let conn = pool.acquire().await?;
//! // ... talk to the store ...
//! conn.release();
//! ```

mod error;
mod pool;

pub use error::PoolError;
pub use pool::{ConnectionPool, PoolStats, PooledConnection, DEFAULT_MAX_CONNECTIONS};
