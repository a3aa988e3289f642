//! Cache Entry Module
//!
//! Defines a single cached payload stamped with its insertion time.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// One cached payload together with the time it was written.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored payload
    pub payload: V,
    /// Insertion timestamp (Unix milliseconds)
    pub inserted_at: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stamped with the given insertion time.
    pub fn new(payload: V, inserted_at: u64) -> Self {
        Self {
            payload,
            inserted_at,
        }
    }

    // == Is Fresh ==
    /// Checks whether the entry may still be served at `now`.
    ///
    /// Boundary condition: the entry is readable only while
    /// `now - inserted_at < ttl_ms`. Once the full TTL has elapsed it is stale.
    /// A clock reading earlier than `inserted_at` counts as zero age.
    pub fn is_fresh_at(&self, now: u64, ttl_ms: u64) -> bool {
        self.age_at(now) < ttl_ms
    }

    // == Age ==
    /// Returns how many milliseconds have passed since insertion.
    pub fn age_at(&self, now: u64) -> u64 {
        now.saturating_sub(self.inserted_at)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
