//! Cache Store Module
//!
//! Bounded cache combining HashMap storage with insertion-order eviction and
//! lazy TTL expiration.

use std::collections::HashMap;

use serde_json::Value;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheCounters, CacheEntry, CacheSnapshot, InsertionOrder};

// == Cache Store ==
/// Bounded key/payload store.
///
/// Expiry is checked only when a key is read. Capacity is enforced only when a
/// new key is written, by evicting the oldest inserted key.
#[derive(Debug)]
pub struct CacheStore<V = Value> {
    /// Key-payload storage
    entries: HashMap<String, CacheEntry<V>>,
    /// First-insertion order of the present keys
    order: InsertionOrder,
    counters: CacheCounters,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Time-to-live in milliseconds
    ttl_ms: u64,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore with the given capacity and TTL.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries the cache can hold
    /// * `ttl_ms` - Time-to-live in milliseconds applied to every entry
    pub fn new(max_entries: usize, ttl_ms: u64) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            counters: CacheCounters::new(),
            max_entries,
            ttl_ms,
        }
    }

    // == Get ==
    /// Retrieves a payload by key using the wall clock.
    pub fn get(&mut self, key: &str) -> Option<V> {
        self.get_at(key, current_timestamp_ms())
    }

    /// Retrieves a payload by key as of `now` (Unix milliseconds).
    ///
    /// A stale entry is removed and reported as absent.
    pub fn get_at(&mut self, key: &str, now: u64) -> Option<V> {
        let fresh = match self.entries.get(key) {
            Some(entry) => entry.is_fresh_at(now, self.ttl_ms),
            None => {
                self.counters.record_miss();
                return None;
            }
        };

        if !fresh {
            self.entries.remove(key);
            self.order.remove(key);
            self.counters.record_expiration();
            self.counters.record_miss();
            return None;
        }

        self.counters.record_hit();
        self.entries.get(key).map(|entry| entry.payload.clone())
    }

    // == Put ==
    /// Stores a payload under `key` using the wall clock.
    pub fn put(&mut self, key: impl Into<String>, payload: V) {
        self.put_at(key, payload, current_timestamp_ms());
    }

    /// Stores a payload under `key`, stamped with `now`.
    ///
    /// Overwriting an existing key refreshes its insertion time but keeps its
    /// place in the eviction order and never evicts. A new key arriving at full
    /// capacity evicts exactly one entry, the oldest inserted.
    pub fn put_at(&mut self, key: impl Into<String>, payload: V, now: u64) {
        let key = key.into();

        if let Some(entry) = self.entries.get_mut(&key) {
            *entry = CacheEntry::new(payload, now);
            return;
        }

        if self.max_entries == 0 {
            return;
        }

        if self.entries.len() >= self.max_entries {
            if let Some(evicted) = self.order.pop_oldest() {
                self.entries.remove(&evicted);
                self.counters.record_eviction();
            }
        }

        self.order.record(&key);
        self.entries.insert(key, CacheEntry::new(payload, now));
    }

    // == Clear ==
    /// Removes every entry and returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.order.clear();
        removed
    }

    // == Stats ==
    /// Returns a snapshot of the store. Stale entries are not purged here.
    pub fn stats(&self) -> CacheSnapshot {
        CacheSnapshot {
            size: self.entries.len(),
            max_size: self.max_entries,
            ttl: self.ttl_ms,
            keys: self.order.iter().map(str::to_string).collect(),
            hits: self.counters.hits,
            misses: self.counters.misses,
            evictions: self.counters.evictions,
            expired: self.counters.expired,
            hit_rate: self.counters.hit_rate(),
        }
    }

    // == Accessors ==
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }

    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks presence without touching freshness or counters.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}
