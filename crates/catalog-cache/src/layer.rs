//! In-process TTL tier over a pooled external store.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, Weak};
use std::time::Duration;

use catalog_pool::{ConnectionPool, PoolStats};
use serde::{de::DeserializeOwned, Serialize};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::{CacheError, ExternalStore};

/// Lifetime of entries in the in-process tier.
pub const LOCAL_TTL: Duration = Duration::from_secs(5 * 60);

/// A value held in the in-process tier.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    stored_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn new(value: String, ttl: Duration) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
            ttl,
        }
    }

    /// Expired once strictly more than `ttl` has elapsed.
    fn is_expired(&self) -> bool {
        self.stored_at.elapsed() > self.ttl
    }
}

/// Two-tier cache: an in-process map in front of an external store.
///
/// Reads are served from the in-process tier while fresh, otherwise fetched
/// from the store through a pooled connection and kept locally for the
/// layer-wide TTL, whatever TTL the value was written with. Writes go
/// straight through to the store with the caller's TTL.
///
/// Store failures are logged and reported as a miss (`None`) or `false`.
/// Only pool failures and (de)serialization errors reach the caller.
pub struct CacheLayer {
    store: Arc<dyn ExternalStore>,
    pool: ConnectionPool,
    namespace: String,
    local_ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl CacheLayer {
    /// Create a cache layer for one store namespace.
    pub fn new(
        store: Arc<dyn ExternalStore>,
        pool: ConnectionPool,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            store,
            pool,
            namespace: namespace.into(),
            local_ttl: LOCAL_TTL,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Override the in-process TTL (default [`LOCAL_TTL`]).
    pub fn with_local_ttl(mut self, ttl: Duration) -> Self {
        self.local_ttl = ttl;
        self
    }

    /// Namespace prefix for in-process keys.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The pool guarding store access.
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Pool occupancy.
    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Name of the backing store.
    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    fn local_key(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }

    /// Look up a value.
    pub async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let local_key = self.local_key(key);
        if let Some(value) = self.local_get(&local_key) {
            debug!(key, "cache hit (in-process)");
            return Ok(Some(value));
        }

        let conn = self.pool.acquire().await?;
        let fetched = self.store.get(key).await;
        conn.release();

        match fetched {
            Ok(Some(value)) if !value.is_empty() => {
                debug!(key, store = self.store.name(), "cache fill from store");
                self.entries
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(local_key, CacheEntry::new(value.clone(), self.local_ttl));
                Ok(Some(value))
            }
            Ok(_) => {
                debug!(key, "cache miss");
                Ok(None)
            }
            Err(e) => {
                warn!(key, error = %e, "store read failed, treating as miss");
                Ok(None)
            }
        }
    }

    /// Write a value through to the store, expiring after `ttl_secs`
    /// (0 = no expiry).
    ///
    /// The in-process copy is dropped rather than updated, so the next read
    /// goes to the store once. It is dropped again after the write, since a
    /// read racing the write may have refilled it with the old value.
    pub async fn put(&self, key: &str, value: &str, ttl_secs: u64) -> Result<bool, CacheError> {
        self.local_remove(key);
        let ttl = (ttl_secs > 0).then(|| Duration::from_secs(ttl_secs));

        let conn = self.pool.acquire().await?;
        let written = self.store.put(key, value, ttl).await;
        conn.release();
        self.local_remove(key);

        match written {
            Ok(()) => {
                debug!(key, ttl_secs, bytes = value.len(), "stored value");
                Ok(true)
            }
            Err(e) => {
                warn!(key, error = %e, "store write failed");
                Ok(false)
            }
        }
    }

    /// Remove a value from both tiers.
    pub async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        self.local_remove(key);

        let conn = self.pool.acquire().await?;
        let deleted = self.store.delete(key).await;
        conn.release();

        match deleted {
            Ok(()) => Ok(true),
            Err(e) => {
                warn!(key, error = %e, "store delete failed");
                Ok(false)
            }
        }
    }

    /// Look up and deserialize a JSON value.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Serialize a value as JSON and write it through.
    pub async fn put_json<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_secs: u64,
    ) -> Result<bool, CacheError> {
        let raw = serde_json::to_string(value)?;
        self.put(key, &raw, ttl_secs).await
    }

    /// Number of entries in the in-process tier, expired ones included.
    pub fn entry_count(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drop every expired in-process entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    /// Periodically purge expired entries until the layer is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let layer: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(cache) = layer.upgrade() else {
                    break;
                };
                let purged = cache.purge_expired();
                if purged > 0 {
                    debug!(purged, "swept expired cache entries");
                }
            }
        })
    }

    /// Release pooled resources. Later store access fails with a pool error.
    pub fn shutdown(&self) {
        self.pool.close();
    }

    fn local_get(&self, local_key: &str) -> Option<String> {
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            match entries.get(local_key) {
                Some(entry) if !entry.is_expired() => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        // Lazy eviction of the expired entry.
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.get(local_key).is_some_and(CacheEntry::is_expired) {
            entries.remove(local_key);
        }
        None
    }

    fn local_remove(&self, key: &str) {
        let local_key = self.local_key(key);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&local_key);
    }
}

impl std::fmt::Debug for CacheLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheLayer")
            .field("store", &self.store.name())
            .field("namespace", &self.namespace)
            .field("local_ttl", &self.local_ttl)
            .field("entries", &self.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use serde::Deserialize;

    fn layer_with(store: &Arc<MemoryStore>) -> CacheLayer {
        CacheLayer::new(store.clone(), ConnectionPool::new(2), "test-ns")
    }

    #[tokio::test]
    async fn test_second_read_served_in_process() {
        let store = Arc::new(MemoryStore::new());
        store.put("k", "v", None).await.unwrap();
        let cache = layer_with(&store);

        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(store.access().gets, 1);
        assert_eq!(cache.entry_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_local_entry_expires() {
        let store = Arc::new(MemoryStore::new());
        store.put("k", "v", None).await.unwrap();
        let cache = layer_with(&store).with_local_ttl(Duration::from_secs(1));

        assert!(cache.get("k").await.unwrap().is_some());
        assert!(cache.get("k").await.unwrap().is_some());
        assert_eq!(store.access().gets, 1);

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(cache.purge_expired(), 1);
        assert!(cache.get("k").await.unwrap().is_some());
        assert_eq!(store.access().gets, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_ttl_honoured_through_layer() {
        let store = Arc::new(MemoryStore::new());
        let cache = layer_with(&store);

        assert!(cache.put("short", "lived", 1).await.unwrap());
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(cache.get("short").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_invalidates_local_copy() {
        let store = Arc::new(MemoryStore::new());
        let cache = layer_with(&store);

        cache.put("k", "old", 0).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("old"));

        cache.put("k", "new", 0).await.unwrap();
        assert_eq!(cache.entry_count(), 0);
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("new"));
        assert_eq!(store.access().gets, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_racing_put_does_not_keep_old_value() {
        let store = Arc::new(MemoryStore::new().with_latency(Duration::from_millis(30)));
        let cache = layer_with(&store);
        cache.put("k", "old", 0).await.unwrap();

        // The read fetches the old value and fills the in-process tier while
        // the write is still in flight.
        let (read, written) = tokio::join!(cache.get("k"), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            cache.put("k", "new", 0).await
        });
        assert_eq!(read.unwrap().as_deref(), Some("old"));
        assert!(written.unwrap());

        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_store_failures_degrade() {
        let store = Arc::new(MemoryStore::new());
        let cache = layer_with(&store);
        store.set_failing(true);

        assert_eq!(cache.get("k").await.unwrap(), None);
        assert!(!cache.put("k", "v", 60).await.unwrap());
        assert!(!cache.delete("k").await.unwrap());
        assert_eq!(cache.pool_stats().active, 0);
    }

    #[tokio::test]
    async fn test_delete_clears_both_tiers() {
        let store = Arc::new(MemoryStore::new());
        let cache = layer_with(&store);
        cache.put("k", "v", 0).await.unwrap();
        cache.get("k").await.unwrap();

        assert!(cache.delete("k").await.unwrap());
        assert_eq!(cache.entry_count(), 0);
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_json_round_trip() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Item {
            name: String,
            price: String,
        }

        let store = Arc::new(MemoryStore::new());
        let cache = layer_with(&store);
        let item = Item {
            name: "Hex bolt".to_string(),
            price: "0.25".to_string(),
        };

        cache.put_json("item", &item, 60).await.unwrap();
        let back: Option<Item> = cache.get_json("item").await.unwrap();
        assert_eq!(back, Some(item));
    }

    #[tokio::test]
    async fn test_shutdown_closes_pool() {
        let store = Arc::new(MemoryStore::new());
        let cache = layer_with(&store);
        cache.shutdown();
        assert!(matches!(cache.get("k").await, Err(CacheError::Pool(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_purges_entries() {
        let store = Arc::new(MemoryStore::new());
        store.put("k", "v", None).await.unwrap();
        let cache = Arc::new(layer_with(&store).with_local_ttl(Duration::from_millis(50)));
        cache.get("k").await.unwrap();

        let sweeper = cache.spawn_sweeper(Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(cache.entry_count(), 0);
        sweeper.abort();
    }
}
