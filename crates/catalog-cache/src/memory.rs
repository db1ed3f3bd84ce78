//! Process-local key-value store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::{ExternalStore, StoreError};

/// Operation counters for a [`MemoryStore`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreAccess {
    pub gets: usize,
    pub puts: usize,
    pub deletes: usize,
}

impl StoreAccess {
    /// Total number of store operations.
    pub fn total(&self) -> usize {
        self.gets + self.puts + self.deletes
    }
}

#[derive(Debug)]
struct StoredValue {
    value: String,
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn is_live(&self) -> bool {
        self.expires_at.map_or(true, |at| Instant::now() < at)
    }
}

/// In-memory store honouring per-key TTLs.
///
/// Used for local development and as a test double: latency and failures
/// can be injected, and every operation is counted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, StoredValue>>,
    latency: Option<Duration>,
    failing: AtomicBool,
    gets: AtomicUsize,
    puts: AtomicUsize,
    deletes: AtomicUsize,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every operation by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make every subsequent operation fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Operation counts so far.
    pub fn access(&self) -> StoreAccess {
        StoreAccess {
            gets: self.gets.load(Ordering::SeqCst),
            puts: self.puts.load(Ordering::SeqCst),
            deletes: self.deletes.load(Ordering::SeqCst),
        }
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|v| v.is_live())
            .count()
    }

    /// Whether the store holds no live keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn round_trip(&self, counter: &AtomicUsize) -> Result<(), StoreError> {
        counter.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is failing".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ExternalStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.round_trip(&self.gets).await?;
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        match values.get(key) {
            Some(stored) if stored.is_live() => Ok(Some(stored.value.clone())),
            Some(_) => {
                values.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        self.round_trip(&self.puts).await?;
        let stored = StoredValue {
            value: value.to_string(),
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), stored);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.round_trip(&self.deletes).await?;
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = MemoryStore::new();
        store.put("k", "v", None).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
        assert_eq!(
            store.access(),
            StoreAccess {
                gets: 2,
                puts: 1,
                deletes: 1
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_expires_value() {
        let store = MemoryStore::new();
        store
            .put("short", "lived", Some(Duration::from_secs(1)))
            .await
            .unwrap();
        assert_eq!(store.get("short").await.unwrap().as_deref(), Some("lived"));

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(store.get("short").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = MemoryStore::new();
        store.set_failing(true);
        assert!(matches!(
            store.get("k").await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.put("k", "v", None).await.is_err());

        store.set_failing(false);
        assert!(store.put("k", "v", None).await.is_ok());
        assert_eq!(store.len(), 1);
    }
}
