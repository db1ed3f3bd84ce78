//! Pool error types.

use std::time::Duration;

use thiserror::Error;

/// Errors returned by [`crate::ConnectionPool::acquire`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// No slot freed up within the configured acquire timeout.
    #[error("connection pool exhausted after waiting {waited:?}")]
    Exhausted { waited: Duration },

    /// The pool has been shut down.
    #[error("connection pool is closed")]
    Closed,
}
