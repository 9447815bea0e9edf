//! Cache Module
//!
//! Provides in-memory memoization with TTL expiration and LRU eviction.

mod entry;
mod handle;
mod lru;
mod options;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use handle::Cache;
pub use lru::LruTracker;
pub use options::CacheOptions;
pub use stats::CacheStats;
pub use store::CacheStore;
