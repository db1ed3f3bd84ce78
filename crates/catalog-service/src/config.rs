//! Service configuration.
//!
//! Loaded from `catalog.toml` (or `.catalog.toml` / `catalog.json`), with the
//! store namespace overridable through `KV_NAMESPACE_ID`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use catalog_cache::{CacheLayer, ExternalStore, MemoryStore, WranglerStore};
use catalog_pool::{ConnectionPool, DEFAULT_MAX_CONNECTIONS};
use catalog_search::pagination::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CatalogError, Result};

/// Environment variable overriding `store.namespace_id`.
pub const NAMESPACE_ENV: &str = "KV_NAMESPACE_ID";

/// File names searched for, in order, in each directory.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["catalog.toml", ".catalog.toml", "catalog.json"];

/// Namespace used by the memory backend when none is configured.
const LOCAL_NAMESPACE: &str = "local";

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub pool: PoolConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub search: SearchConfig,
}

/// Which key-value backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Process-local store.
    #[default]
    Memory,
    /// Hosted namespace driven through the wrangler CLI.
    Wrangler,
}

/// Store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: Backend,

    /// Key-value namespace identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_id: Option<String>,

    /// Pass `--remote` to wrangler.
    #[serde(default = "default_true")]
    pub remote: bool,
}

fn default_true() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Memory,
            namespace_id: None,
            remote: true,
        }
    }
}

/// Connection pool settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolConfig {
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    /// Acquire timeout in milliseconds; 0 waits forever.
    #[serde(default)]
    pub acquire_timeout_ms: u64,
}

fn default_max_connections() -> usize {
    DEFAULT_MAX_CONNECTIONS
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            acquire_timeout_ms: 0,
        }
    }
}

/// In-process cache tier settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_local_ttl")]
    pub local_ttl_secs: u64,

    /// Background sweep period in seconds; 0 disables the sweeper.
    #[serde(default)]
    pub sweep_interval_secs: u64,
}

fn default_local_ttl() -> u64 {
    catalog_cache::LOCAL_TTL.as_secs()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            local_ttl_secs: default_local_ttl(),
            sweep_interval_secs: 0,
        }
    }
}

/// Search settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Store TTL for cached search results.
    #[serde(default = "default_result_ttl")]
    pub result_ttl_secs: u64,

    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
}

fn default_result_ttl() -> u64 {
    300
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            result_ttl_secs: default_result_ttl(),
            default_page_size: default_page_size(),
        }
    }
}

impl CatalogConfig {
    /// Load config from a TOML or JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::config(format!("failed to read {}: {}", path.display(), e))
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|e| {
                CatalogError::config(format!("failed to parse {}: {}", path.display(), e))
            })
        } else {
            toml::from_str(&content).map_err(|e| {
                CatalogError::config(format!("failed to parse {}: {}", path.display(), e))
            })
        }
    }

    /// Find the nearest config file in `start` or its ancestors.
    pub fn find(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for name in CONFIG_FILE_NAMES {
                let candidate = current.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load the nearest config file, or defaults when there is none.
    pub fn discover(start: &Path) -> Result<Self> {
        match Self::find(start) {
            Some(path) => {
                debug!(path = %path.display(), "loading config");
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply `KV_NAMESPACE_ID` from the process environment.
    pub fn with_env(self) -> Self {
        self.with_namespace_override(std::env::var(NAMESPACE_ENV).ok())
    }

    /// Replace the namespace when `namespace` is a non-empty value.
    pub fn with_namespace_override(mut self, namespace: Option<String>) -> Self {
        if let Some(id) = namespace.filter(|id| !id.trim().is_empty()) {
            self.store.namespace_id = Some(id);
        }
        self
    }

    /// The configured namespace.
    ///
    /// Required for the wrangler backend; the memory backend falls back to a
    /// local namespace.
    pub fn namespace_id(&self) -> Result<&str> {
        match (self.store.namespace_id.as_deref(), self.store.backend) {
            (Some(id), _) if !id.trim().is_empty() => Ok(id),
            (_, Backend::Memory) => Ok(LOCAL_NAMESPACE),
            (_, Backend::Wrangler) => Err(CatalogError::config(format!(
                "KV namespace not configured (set store.namespace_id or {NAMESPACE_ENV})"
            ))),
        }
    }

    /// Acquire timeout, if any.
    pub fn acquire_timeout(&self) -> Option<Duration> {
        (self.pool.acquire_timeout_ms > 0).then(|| Duration::from_millis(self.pool.acquire_timeout_ms))
    }

    /// Background sweep period, if any.
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.cache.sweep_interval_secs > 0).then(|| Duration::from_secs(self.cache.sweep_interval_secs))
    }

    /// Build the configured store backend.
    pub fn build_store(&self) -> Result<Arc<dyn ExternalStore>> {
        let namespace = self.namespace_id()?;
        Ok(match self.store.backend {
            Backend::Memory => Arc::new(MemoryStore::new()),
            Backend::Wrangler => {
                let store = WranglerStore::new(namespace);
                if self.store.remote {
                    Arc::new(store)
                } else {
                    Arc::new(store.local())
                }
            }
        })
    }

    /// Build the connection pool.
    pub fn build_pool(&self) -> ConnectionPool {
        let pool = ConnectionPool::new(self.pool.max_connections);
        match self.acquire_timeout() {
            Some(timeout) => pool.with_acquire_timeout(timeout),
            None => pool,
        }
    }

    /// Build a cache layer over `store`.
    pub fn build_cache(&self, store: Arc<dyn ExternalStore>) -> Result<CacheLayer> {
        Ok(CacheLayer::new(store, self.build_pool(), self.namespace_id()?)
            .with_local_ttl(Duration::from_secs(self.cache.local_ttl_secs)))
    }
}
