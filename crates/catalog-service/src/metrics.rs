//! Request counters and the metrics snapshot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use catalog_pool::PoolStats;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Process-lifetime request counters.
#[derive(Debug)]
pub struct ServiceMetrics {
    started: Instant,
    requests: AtomicU64,
    cache_hits: AtomicU64,
    response_us: AtomicU64,
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            requests: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            response_us: AtomicU64::new(0),
        }
    }

    /// Record one completed search.
    pub fn record(&self, elapsed: Duration, cache_hit: bool) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        if cache_hit {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
        }
        self.response_us
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
    }

    /// Completed searches so far.
    pub fn total_requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Searches answered from the result cache.
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    /// Mean response time in milliseconds, 0 before the first request.
    pub fn average_response_ms(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            return 0.0;
        }
        self.response_us.load(Ordering::Relaxed) as f64 / total as f64 / 1000.0
    }

    /// Time since the counters were created.
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    /// Capture the counters alongside cache and pool state.
    pub fn snapshot(&self, local_entries: usize, pool: PoolStats) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            uptime_secs: self.uptime().as_secs_f64(),
            cache: CacheMetrics { local_entries },
            pool,
            requests: RequestMetrics {
                total: self.total_requests(),
                cache_hits: self.cache_hits(),
                average_response_ms: self.average_response_ms(),
            },
        }
    }
}

/// Point-in-time service metrics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub uptime_secs: f64,
    pub cache: CacheMetrics,
    pub pool: PoolStats,
    pub requests: RequestMetrics,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheMetrics {
    /// Entries held by the in-process cache tier.
    pub local_entries: usize,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMetrics {
    pub total: u64,
    pub cache_hits: u64,
    pub average_response_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> PoolStats {
        PoolStats {
            active: 0,
            waiting: 0,
            max: 10,
        }
    }

    #[test]
    fn test_empty_metrics() {
        let metrics = ServiceMetrics::new();
        assert_eq!(metrics.total_requests(), 0);
        assert_eq!(metrics.average_response_ms(), 0.0);
    }

    #[test]
    fn test_record_and_average() {
        let metrics = ServiceMetrics::new();
        metrics.record(Duration::from_millis(10), false);
        metrics.record(Duration::from_millis(30), true);

        assert_eq!(metrics.total_requests(), 2);
        assert_eq!(metrics.cache_hits(), 1);
        assert!((metrics.average_response_ms() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_shape() {
        let metrics = ServiceMetrics::new();
        metrics.record(Duration::from_millis(4), true);
        let value = serde_json::to_value(metrics.snapshot(3, pool())).unwrap();

        assert_eq!(value["cache"]["localEntries"], 3);
        assert_eq!(value["pool"]["max"], 10);
        assert_eq!(value["requests"]["total"], 1);
        assert_eq!(value["requests"]["cacheHits"], 1);
        assert!(value["timestamp"].is_string());
    }
}
