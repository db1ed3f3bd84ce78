//! Cache error types.

use catalog_pool::PoolError;
use thiserror::Error;

/// Failures reported by an [`crate::ExternalStore`].
///
/// These stop at the cache layer boundary.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store could not be reached or refused the operation.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// An external command exited unsuccessfully.
    #[error("`{command}` failed: {message}")]
    Command { command: String, message: String },

    /// Local I/O while talking to the store.
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store returned bytes that are not UTF-8.
    #[error("Store returned invalid UTF-8 for key {0}")]
    Encoding(String),
}

/// Errors that escape the cache layer.
#[derive(Error, Debug)]
pub enum CacheError {
    /// No pool slot could be obtained.
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// Failed to serialize or deserialize a value.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
