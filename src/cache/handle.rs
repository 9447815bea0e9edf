//! Cache Handle Module
//!
//! Shared async front door over [`CacheStore`]. All operations go through a
//! tokio `RwLock`, so `set`/`get`/`delete`/`clear` are atomic with respect
//! to each other and to the background sweep. `get_or_set` releases the
//! lock across the caller-supplied populate future, so it is deliberately
//! not atomic across its miss-populate-store sequence: concurrent callers
//! racing on the same absent key each run their populate function and the
//! last store wins.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::info;

use crate::cache::{CacheOptions, CacheStats, CacheStore};
use crate::config::CacheConfig;
use crate::tasks::spawn_sweep_task;
use crate::telemetry::{ErrorContext, ErrorReporter, TracingReporter};

// == Cache Handle ==
/// Process-local memoization cache with TTL expiry and LRU eviction.
///
/// Construct one explicitly and pass clones to consumers; clones share the
/// same underlying store. The background expiry sweep is started with
/// [`Cache::start`] and must be stopped with [`Cache::stop`] for clean
/// shutdown, otherwise the recurring task lives for the rest of the
/// process.
///
/// `set`, `get`, `delete` and `clear` never surface internal faults to the
/// caller: faults are forwarded to the configured [`ErrorReporter`] and the
/// operation degrades to a miss or a `false` return. A cache malfunction
/// therefore costs callers a refetch, never an error.
pub struct Cache<V> {
    /// Shared synchronous core
    store: Arc<RwLock<CacheStore<V>>>,
    /// External error-tracking collaborator
    reporter: Arc<dyn ErrorReporter>,
    /// Interval of the background expiry sweep
    sweep_interval: Duration,
    /// Running sweep task, if started
    sweeper: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl<V> Clone for Cache<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            reporter: Arc::clone(&self.reporter),
            sweep_interval: self.sweep_interval,
            sweeper: Arc::clone(&self.sweeper),
        }
    }
}

impl<V: Clone + Send + Sync + 'static> Cache<V> {
    // == Constructors ==
    /// Creates a cache with the given configuration and the default
    /// tracing-backed error reporter. The sweep task is not started.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_reporter(config, Arc::new(TracingReporter))
    }

    /// Creates a cache with a custom error-tracking collaborator.
    pub fn with_reporter(config: CacheConfig, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new(
                config.max_size,
                config.default_ttl,
            ))),
            reporter,
            sweep_interval: config.cleanup_interval,
            sweeper: Arc::new(Mutex::new(None)),
        }
    }

    // == Set ==
    /// Stores `value` under `key`, evicting the least recently used entry
    /// first when a new key would exceed capacity.
    ///
    /// Returns whether the value was stored. Internal faults are reported
    /// and degrade to a no-op returning `false`; they never propagate.
    pub async fn set(&self, key: &str, value: V, options: &CacheOptions) -> bool {
        let mut store = self.store.write().await;
        match store.set(key, value, options.ttl) {
            Ok(()) => true,
            Err(err) => {
                self.reporter
                    .report(&err, &ErrorContext::new("cache.set").with_key(key));
                false
            }
        }
    }

    // == Get ==
    /// Returns the stored value if present and not expired, or `None` on a
    /// miss. With `options.stale_while_revalidate`, an expired value is
    /// returned instead of a miss, without extending its TTL.
    pub async fn get(&self, key: &str, options: &CacheOptions) -> Option<V> {
        let mut store = self.store.write().await;
        match store.get(key, options) {
            Ok(value) => Some(value),
            Err(err) if err.is_miss() => None,
            Err(err) => {
                self.reporter
                    .report(&err, &ErrorContext::new("cache.get").with_key(key));
                None
            }
        }
    }

    // == Get Or Set ==
    /// Returns the cached value on a hit; on a miss, awaits `populate`,
    /// stores its result with the same options and returns it.
    ///
    /// A populate failure is reported to the error reporter, then
    /// propagates unchanged to the caller with nothing cached; whether the
    /// underlying operation is retriable is the caller's call. The store
    /// lock is not held across the populate await, so concurrent callers
    /// missing on the same key each invoke their own populate function.
    pub async fn get_or_set<F, Fut, E>(
        &self,
        key: &str,
        populate: F,
        options: &CacheOptions,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: fmt::Display,
    {
        if let Some(value) = self.get(key, options).await {
            return Ok(value);
        }

        match populate().await {
            Ok(fresh) => {
                self.set(key, fresh.clone(), options).await;
                Ok(fresh)
            }
            Err(err) => {
                self.reporter
                    .report(&err, &ErrorContext::new("cache.get_or_set").with_key(key));
                Err(err)
            }
        }
    }

    // == Delete ==
    /// Removes the entry if present. Idempotent; returns whether an entry
    /// was removed.
    pub async fn delete(&self, key: &str) -> bool {
        self.store.write().await.delete(key)
    }

    // == Clear ==
    /// Removes all entries. Used for full invalidation, e.g. on logout.
    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    // == Length ==
    /// Returns the current number of entries.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Returns true if the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    // == Start ==
    /// Starts the background expiry sweep. Idempotent: if a sweep task is
    /// already running, no second task is spawned.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) {
        // Poisoning only marks that another holder panicked; the slot
        // itself is still usable
        let mut sweeper = self
            .sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = sweeper.as_ref() {
            if !handle.is_finished() {
                return;
            }
        }
        *sweeper = Some(spawn_sweep_task(
            Arc::clone(&self.store),
            self.sweep_interval,
        ));
    }

    // == Stop ==
    /// Stops the background expiry sweep. Safe to call when not running.
    pub fn stop(&self) {
        let mut sweeper = self
            .sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = sweeper.take() {
            handle.abort();
            info!("Expiry sweep task stopped");
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Reporter that records every fault it receives.
    #[derive(Default)]
    struct RecordingReporter {
        reports: Mutex<Vec<(String, String)>>,
    }

    impl ErrorReporter for RecordingReporter {
        fn report(&self, error: &dyn fmt::Display, context: &ErrorContext) {
            self.reports
                .lock()
                .unwrap()
                .push((error.to_string(), context.to_string()));
        }
    }

    fn test_config() -> CacheConfig {
        CacheConfig {
            default_ttl: Duration::from_secs(300),
            max_size: 100,
            cleanup_interval: Duration::from_millis(50),
        }
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let cache: Cache<String> = Cache::new(test_config());

        assert!(
            cache
                .set("key1", "value1".to_string(), &CacheOptions::default())
                .await
        );
        let value = cache.get("key1", &CacheOptions::default()).await;

        assert_eq!(value, Some("value1".to_string()));
    }

    #[tokio::test]
    async fn test_get_miss_is_none() {
        let cache: Cache<String> = Cache::new(test_config());
        assert_eq!(cache.get("absent", &CacheOptions::default()).await, None);
    }

    #[tokio::test]
    async fn test_get_or_set_skips_populate_on_hit() {
        let cache: Cache<String> = Cache::new(test_config());
        cache
            .set("key1", "cached".to_string(), &CacheOptions::default())
            .await;

        let calls = AtomicUsize::new(0);
        let result: Result<String, CacheError> = cache
            .get_or_set(
                "key1",
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("fresh".to_string())
                },
                &CacheOptions::default(),
            )
            .await;

        assert_eq!(result.unwrap(), "cached");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_get_or_set_populates_on_miss() {
        let cache: Cache<String> = Cache::new(test_config());

        let calls = AtomicUsize::new(0);
        let result: Result<String, CacheError> = cache
            .get_or_set(
                "key1",
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("fresh".to_string())
                },
                &CacheOptions::default(),
            )
            .await;

        assert_eq!(result.unwrap(), "fresh");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Subsequent get serves the stored result without repopulating
        let value = cache.get("key1", &CacheOptions::default()).await;
        assert_eq!(value, Some("fresh".to_string()));
    }

    #[tokio::test]
    async fn test_get_or_set_propagates_populate_failure() {
        let cache: Cache<String> = Cache::new(test_config());

        let result: Result<String, String> = cache
            .get_or_set(
                "key1",
                || async { Err("backend down".to_string()) },
                &CacheOptions::default(),
            )
            .await;

        assert_eq!(result.unwrap_err(), "backend down");
        // Nothing was cached
        assert_eq!(cache.get("key1", &CacheOptions::default()).await, None);
    }

    #[tokio::test]
    async fn test_get_or_set_serves_stale_value() {
        let cache: Cache<String> = Cache::new(test_config());
        cache
            .set(
                "key1",
                "stale".to_string(),
                &CacheOptions::with_ttl(Duration::from_millis(20)),
            )
            .await;

        tokio::time::sleep(Duration::from_millis(50)).await;

        let calls = AtomicUsize::new(0);
        let result: Result<String, CacheError> = cache
            .get_or_set(
                "key1",
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("fresh".to_string())
                },
                &CacheOptions::stale_while_revalidate(),
            )
            .await;

        assert_eq!(result.unwrap(), "stale");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_set_reports_fault_and_returns_false() {
        let reporter = Arc::new(RecordingReporter::default());
        let config = CacheConfig {
            max_size: 0,
            ..test_config()
        };
        let cache: Cache<String> = Cache::with_reporter(config, reporter.clone());

        let stored = cache
            .set("key1", "value1".to_string(), &CacheOptions::default())
            .await;

        assert!(!stored);
        let reports = reporter.reports.lock().unwrap();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].1.contains("cache.set"));
        assert!(reports[0].1.contains("key1"));
    }

    #[tokio::test]
    async fn test_misses_are_not_reported() {
        let reporter = Arc::new(RecordingReporter::default());
        let cache: Cache<String> = Cache::with_reporter(test_config(), reporter.clone());

        assert_eq!(cache.get("absent", &CacheOptions::default()).await, None);

        cache
            .set(
                "expired",
                "value".to_string(),
                &CacheOptions::with_ttl(Duration::from_millis(10)),
            )
            .await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.get("expired", &CacheOptions::default()).await, None);

        assert!(reporter.reports.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_populate_failure_is_reported() {
        let reporter = Arc::new(RecordingReporter::default());
        let cache: Cache<String> = Cache::with_reporter(test_config(), reporter.clone());

        let result: Result<String, String> = cache
            .get_or_set(
                "key1",
                || async { Err("backend down".to_string()) },
                &CacheOptions::default(),
            )
            .await;

        assert!(result.is_err());
        let reports = reporter.reports.lock().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].0, "backend down");
        assert!(reports[0].1.contains("cache.get_or_set"));
        assert!(reports[0].1.contains("key1"));
    }

    #[tokio::test]
    async fn test_start_and_stop_recover_from_poisoned_lock() {
        let cache: Cache<String> = Cache::new(test_config());

        // Poison the sweeper slot by panicking while holding its guard
        let sweeper = Arc::clone(&cache.sweeper);
        let _ = std::thread::spawn(move || {
            let _guard = sweeper.lock().unwrap();
            panic!("poisoning the sweeper slot");
        })
        .join();
        assert!(cache.sweeper.is_poisoned());

        // Lifecycle calls still work instead of panicking
        cache.start();
        cache.stop();
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let cache: Cache<String> = Cache::new(test_config());
        cache
            .set("key1", "value1".to_string(), &CacheOptions::default())
            .await;

        assert!(cache.delete("key1").await);
        assert!(!cache.delete("key1").await);
        assert!(!cache.delete("never_existed").await);
    }

    #[tokio::test]
    async fn test_clear_empties_the_store() {
        let cache: Cache<String> = Cache::new(test_config());
        cache
            .set("key1", "value1".to_string(), &CacheOptions::default())
            .await;
        cache
            .set("key2", "value2".to_string(), &CacheOptions::default())
            .await;

        cache.clear().await;

        assert!(cache.is_empty().await);
        assert_eq!(cache.get("key1", &CacheOptions::default()).await, None);
        assert_eq!(cache.get("key2", &CacheOptions::default()).await, None);
    }

    #[tokio::test]
    async fn test_clones_share_the_store() {
        let cache: Cache<String> = Cache::new(test_config());
        let other = cache.clone();

        cache
            .set("key1", "value1".to_string(), &CacheOptions::default())
            .await;

        assert_eq!(
            other.get("key1", &CacheOptions::default()).await,
            Some("value1".to_string())
        );
    }

    #[tokio::test]
    async fn test_stop_without_start_is_noop() {
        let cache: Cache<String> = Cache::new(test_config());
        cache.stop();
        cache.stop();
    }
}
