//! External key-value store boundary.

use std::time::Duration;

use async_trait::async_trait;

use crate::StoreError;

/// Opaque get/put/delete backend, possibly slow and possibly failing.
#[async_trait]
pub trait ExternalStore: Send + Sync {
    /// Read a value. `Ok(None)` when the key is absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, expiring after `ttl` when given.
    async fn put(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError>;

    /// Remove a value. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}
