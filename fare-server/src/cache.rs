//! Caching layer for aggregated results.
//!
//! Booking sites are slow and rate-limit aggressively, so an aggregated
//! answer is kept for a fixed TTL and reused for any request that normalizes
//! to the same route, date and mode. Expiry is checked on read.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::future::Cache as MokaCache;

use crate::aggregator::{AggregatedResult, Mode};
use crate::domain::{Route, TravelDate};

/// Default time-to-live for a cached result.
pub const DEFAULT_TTL_SECS: u64 = 600;

/// Default maximum number of cached results.
pub const DEFAULT_MAX_CAPACITY: u64 = 1000;

/// Cache key: canonical route, date and aggregation mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub route: Route,
    pub date: TravelDate,
    pub mode: Mode,
}

impl CacheKey {
    pub fn new(route: Route, date: TravelDate, mode: Mode) -> Self {
        Self { route, date, mode }
    }
}

/// A cached aggregation and when it was made.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub result: Arc<AggregatedResult>,
    pub created_at: DateTime<Utc>,
}

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}

impl CacheConfig {
    /// Set the TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the maximum number of entries.
    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }
}

/// Process-lifetime cache of aggregated results.
pub struct ResultCache {
    entries: MokaCache<CacheKey, CacheEntry>,
    ttl: Duration,
}

impl ResultCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let entries = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            entries,
            ttl: config.ttl,
        }
    }

    /// Look up a live entry. Expired entries are never returned.
    pub async fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.entries.get(key).await
    }

    /// Store a result, replacing any previous entry for the key.
    pub async fn put(&self, key: CacheKey, result: Arc<AggregatedResult>) {
        let entry = CacheEntry {
            result,
            created_at: Utc::now(),
        };
        self.entries.insert(key, entry).await;
    }

    /// Approximate number of live entries (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }

    /// The configured TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.entry_count())
            .finish()
    }
}
