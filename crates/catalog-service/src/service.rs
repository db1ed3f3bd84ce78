//! The cached search service.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use catalog_cache::CacheLayer;
use catalog_search::{search_products, CatalogPayload, ScoringStrategy, SearchIndex};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::{CatalogConfig, SearchConfig};
use crate::error::{CatalogError, Result};
use crate::metrics::{MetricsSnapshot, ServiceMetrics};
use crate::request::SearchRequest;
use crate::result::SearchResult;
use crate::sample::sample_catalog;

/// Store key holding the catalog document.
pub const PRODUCTS_KEY: &str = "products_data";

/// Store TTL for catalog writes (24 hours).
pub const CATALOG_TTL_SECS: u64 = 86_400;

type FlightMap = HashMap<String, Arc<tokio::sync::Mutex<()>>>;

/// Catalog search over a [`CacheLayer`].
///
/// Results are cached per request under a key derived from the query,
/// page, page size and sort order. At most one computation per key runs at
/// a time; concurrent identical misses wait for it and then read the cached
/// result.
pub struct SearchService {
    cache: Arc<CacheLayer>,
    config: SearchConfig,
    metrics: ServiceMetrics,
    in_flight: Mutex<FlightMap>,
    sweeper: Option<JoinHandle<()>>,
}

impl SearchService {
    /// Create a service over an existing cache layer.
    pub fn new(cache: Arc<CacheLayer>, config: SearchConfig) -> Self {
        Self {
            cache,
            config,
            metrics: ServiceMetrics::new(),
            in_flight: Mutex::new(HashMap::new()),
            sweeper: None,
        }
    }

    /// Build the store, pool and cache layer described by `config`.
    ///
    /// Starts the background sweeper when one is configured, so this must
    /// run inside a Tokio runtime.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let cache = Arc::new(config.build_cache(config.build_store()?)?);
        let mut service = Self::new(cache, config.search.clone());
        if let Some(interval) = config.sweep_interval() {
            service.sweeper = Some(service.cache.spawn_sweeper(interval));
        }
        info!(
            store = service.cache.store_name(),
            namespace = service.cache.namespace(),
            "search service ready"
        );
        Ok(service)
    }

    /// The underlying cache layer.
    pub fn cache(&self) -> &Arc<CacheLayer> {
        &self.cache
    }

    /// Run a search, serving from the result cache when possible.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResult> {
        let started = Instant::now();
        request.validate()?;
        let key = request.cache_key()?;

        if let Some(hit) = self.cached_result(&key).await? {
            self.metrics.record(started.elapsed(), true);
            return Ok(hit);
        }

        let flight = self.flight(&key);
        let outcome = {
            let _leader = flight.lock().await;
            match self.cached_result(&key).await {
                Ok(Some(hit)) => Ok((hit, true)),
                Ok(None) => self.compute(request, &key).await.map(|r| (r, false)),
                Err(e) => Err(e),
            }
        };
        drop(flight);

        let (result, cache_hit) = outcome?;
        self.metrics.record(started.elapsed(), cache_hit);
        Ok(result)
    }

    /// Search through an inverted index with weighted scoring.
    ///
    /// The index is built from the current catalog on every call and the
    /// result is not cached.
    pub async fn indexed_search(&self, request: &SearchRequest) -> Result<SearchResult> {
        let started = Instant::now();
        request.validate()?;

        let index = SearchIndex::build(self.load_catalog().await?.into_products());
        let hits = index.search(&request.query, request.sort_by, request.page, request.page_size);
        let result = SearchResult::from_hits(request, hits);

        self.metrics.record(started.elapsed(), false);
        Ok(result)
    }

    /// The full catalog document.
    pub async fn products(&self) -> Result<CatalogPayload> {
        self.load_catalog().await
    }

    /// Run a catalog management action.
    pub async fn manage(&self, action: ManageAction) -> Result<ManageOutcome> {
        match action {
            ManageAction::Populate => {
                let count = self.write_catalog(&sample_catalog()).await?;
                Ok(ManageOutcome {
                    success: true,
                    message: format!("Successfully populated KV with {count} sample products"),
                    count: Some(count),
                    has_data: None,
                })
            }
            ManageAction::Clear => {
                if !self.cache.delete(PRODUCTS_KEY).await? {
                    return Err(CatalogError::Backend("failed to clear catalog".into()));
                }
                info!("catalog cleared");
                Ok(ManageOutcome {
                    success: true,
                    message: "KV cache cleared successfully".into(),
                    count: None,
                    has_data: None,
                })
            }
            ManageAction::Status => {
                let has_data = self.cache.get(PRODUCTS_KEY).await?.is_some();
                Ok(ManageOutcome {
                    success: true,
                    message: if has_data {
                        "KV contains cached data".into()
                    } else {
                        "KV is empty".into()
                    },
                    count: None,
                    has_data: Some(has_data),
                })
            }
        }
    }

    /// Replace the catalog. Returns the number of products written.
    pub async fn import_catalog(&self, payload: &CatalogPayload) -> Result<usize> {
        if payload.products().is_empty() {
            return Err(CatalogError::validation("catalog contains no products"));
        }
        self.write_catalog(payload).await
    }

    /// Current metrics.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics
            .snapshot(self.cache.entry_count(), self.cache.pool_stats())
    }

    /// Stop the sweeper and close the pool.
    pub fn shutdown(&self) {
        if let Some(sweeper) = &self.sweeper {
            sweeper.abort();
        }
        self.cache.shutdown();
        info!("search service shut down");
    }

    async fn cached_result(&self, key: &str) -> Result<Option<SearchResult>> {
        let Some(raw) = self.cache.get(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<SearchResult>(&raw) {
            Ok(result) => {
                debug!(query = %result.query, "returning cached search results");
                Ok(Some(result.into_cached()))
            }
            Err(e) => {
                warn!(key, error = %e, "discarding unreadable cached result");
                Ok(None)
            }
        }
    }

    async fn compute(&self, request: &SearchRequest, key: &str) -> Result<SearchResult> {
        let catalog = self.load_catalog().await?;
        let hits = search_products(
            catalog.products(),
            &request.query,
            ScoringStrategy::Substring,
            request.sort_by,
            request.page,
            request.page_size,
        );
        let result = SearchResult::from_hits(request, hits);

        if !self
            .cache
            .put_json(key, &result, self.config.result_ttl_secs)
            .await?
        {
            warn!(key, "search result was not cached");
        }
        info!(query = %request.query, total = result.total, "search completed");
        Ok(result)
    }

    async fn load_catalog(&self) -> Result<CatalogPayload> {
        let raw = self
            .cache
            .get(PRODUCTS_KEY)
            .await?
            .ok_or(CatalogError::NoData)?;
        let catalog: CatalogPayload = serde_json::from_str(&raw)?;
        debug!(products = catalog.products().len(), "loaded catalog");
        Ok(catalog)
    }

    async fn write_catalog(&self, payload: &CatalogPayload) -> Result<usize> {
        let count = payload.products().len();
        if !self
            .cache
            .put_json(PRODUCTS_KEY, payload, CATALOG_TTL_SECS)
            .await?
        {
            return Err(CatalogError::Backend("failed to write catalog".into()));
        }
        info!(count, "catalog written");
        Ok(count)
    }

    fn flights(&self) -> MutexGuard<'_, FlightMap> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn flight(&self, key: &str) -> Flight<'_> {
        let lock = self.flights().entry(key.to_string()).or_default().clone();
        Flight {
            service: self,
            key: key.to_string(),
            lock,
        }
    }

    #[cfg(test)]
    fn flights_in_progress(&self) -> usize {
        self.flights().len()
    }
}

/// A caller's share of one key's flight.
///
/// Dropping it, including when the search future is cancelled, removes the
/// key from the flight map once no other caller shares it.
struct Flight<'a> {
    service: &'a SearchService,
    key: String,
    lock: Arc<tokio::sync::Mutex<()>>,
}

impl Flight<'_> {
    async fn lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}

impl Drop for Flight<'_> {
    fn drop(&mut self) {
        let mut flights = self.service.flights();
        let lock = std::mem::take(&mut self.lock);
        let idle = flights
            .get(&self.key)
            .is_some_and(|current| Arc::ptr_eq(current, &lock) && Arc::strong_count(&lock) == 2);
        // Release under the map lock so the next caller to land sees the new count.
        drop(lock);
        if idle {
            flights.remove(&self.key);
        }
    }
}

impl fmt::Debug for SearchService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchService")
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Catalog management actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManageAction {
    /// Write the sample catalog.
    Populate,
    /// Delete the catalog.
    Clear,
    /// Report whether a catalog is present.
    Status,
}

impl ManageAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ManageAction::Populate => "populate",
            ManageAction::Clear => "clear",
            ManageAction::Status => "status",
        }
    }
}

impl fmt::Display for ManageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ManageAction {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "populate" => Ok(ManageAction::Populate),
            "clear" => Ok(ManageAction::Clear),
            "status" => Ok(ManageAction::Status),
            other => Err(CatalogError::InvalidAction(other.to_string())),
        }
    }
}

/// Response of a management action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManageOutcome {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_data: Option<bool>,
}
