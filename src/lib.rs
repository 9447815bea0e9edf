//! Memo Cache - an in-memory memoization cache
//!
//! Provides a process-local, string-keyed cache with TTL expiration, LRU
//! eviction, a background expiry sweep and an async get-or-populate
//! operation for wrapping calls to expensive or rate-limited data sources.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;
pub mod telemetry;

pub use cache::{Cache, CacheOptions, CacheStats, CacheStore};
pub use config::CacheConfig;
pub use error::CacheError;
pub use tasks::spawn_sweep_task;
pub use telemetry::{ErrorContext, ErrorReporter, TracingReporter};
