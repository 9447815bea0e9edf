//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache store operations.
///
/// `NotFound` and `Expired` are benign misses; the [`Cache`](crate::Cache)
/// handle converts them to `None` without reporting. `EvictionFailed` is an
/// internal bookkeeping fault and is forwarded to the error reporter.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key has expired
    #[error("Key expired: {0}")]
    Expired(String),

    /// Store is at capacity but the LRU tracker produced no eviction candidate
    #[error("Eviction failed while inserting: {0}")]
    EvictionFailed(String),
}

impl CacheError {
    /// Returns true for errors that represent a normal cache miss rather
    /// than an internal fault.
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::NotFound(_) | CacheError::Expired(_))
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache store operations.
pub type Result<T> = std::result::Result<T, CacheError>;
