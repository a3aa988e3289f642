//! Cache Module
//!
//! Provides a bounded in-memory cache with lazy TTL expiration and
//! oldest-inserted-first eviction.

mod entry;
mod order;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use order::InsertionOrder;
pub use stats::{CacheCounters, CacheSnapshot};
pub use store::CacheStore;
