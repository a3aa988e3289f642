//! Cache Statistics Module
//!
//! Tracks cache counters and builds read-only snapshots of the store.

use serde::Serialize;

// == Cache Counters ==
/// Running counters updated by the store on every access.
#[derive(Debug, Clone, Default)]
pub struct CacheCounters {
    /// Reads that returned a fresh payload
    pub hits: u64,
    /// Reads that found nothing or found a stale entry
    pub misses: u64,
    /// Entries removed to make room for a new key
    pub evictions: u64,
    /// Entries purged lazily because their TTL elapsed
    pub expired: u64,
}

impl CacheCounters {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expired += 1;
    }
}

// == Cache Snapshot ==
/// Point-in-time view of the store, as reported by `/cache/stats`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSnapshot {
    /// Current number of entries, stale ones included
    pub size: usize,
    /// Configured capacity
    pub max_size: usize,
    /// Configured TTL in milliseconds
    pub ttl: u64,
    /// Keys from oldest to newest insertion
    pub keys: Vec<String>,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expired: u64,
    pub hit_rate: f64,
}
