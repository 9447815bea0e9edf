//! Cache Store Module
//!
//! Synchronous cache core combining HashMap storage with LRU tracking and
//! TTL expiration. The async [`Cache`](crate::Cache) handle wraps this store
//! behind a lock; the store itself performs no I/O and never blocks.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheOptions, CacheStats, LruTracker};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Main cache storage with LRU eviction and TTL support.
///
/// The value type is opaque; it only needs to be cloneable so reads can
/// hand out a copy while the entry stays in the store.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_size: usize,
    /// TTL applied to entries stored without an explicit TTL
    default_ttl: Duration,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore with the given capacity and default TTL.
    pub fn new(max_size: usize, default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_size,
            default_ttl,
        }
    }

    // == Set ==
    /// Stores a key-value pair with an optional TTL override.
    ///
    /// If the key already exists, the value, TTL and last-access time are
    /// replaced in place; an overwrite does not count against capacity. If
    /// the key is new and the store is at capacity, the least recently used
    /// entry is evicted first, so the entry count never exceeds `max_size`
    /// once `set` returns.
    pub fn set(&mut self, key: &str, value: V, ttl: Option<Duration>) -> Result<()> {
        let is_overwrite = self.entries.contains_key(key);

        if !is_overwrite && self.entries.len() >= self.max_size {
            match self.lru.pop_lru() {
                Some(evicted_key) => {
                    self.entries.remove(&evicted_key);
                    self.stats.record_eviction();
                }
                None => {
                    // Map full but tracker empty: bookkeeping went out of sync
                    return Err(CacheError::EvictionFailed(key.to_string()));
                }
            }
        }

        let effective_ttl = ttl.unwrap_or(self.default_ttl);
        self.entries
            .insert(key.to_string(), CacheEntry::new(value, effective_ttl));
        self.lru.record_access(key);
        self.stats.set_total_entries(self.entries.len());

        Ok(())
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A present, live entry is returned and becomes the most recently
    /// used. An expired entry is returned as a stale hit when
    /// `options.stale_while_revalidate` is set, without extending its TTL;
    /// otherwise it is removed and counted as a miss. Every lookup that
    /// finds the entry bumps its last-access time, stale or not.
    pub fn get(&mut self, key: &str, options: &CacheOptions) -> Result<V> {
        let Some(entry) = self.entries.get_mut(key) else {
            self.stats.record_miss();
            return Err(CacheError::NotFound(key.to_string()));
        };

        let expired = entry.is_expired();
        entry.touch();

        if !expired {
            let value = entry.value.clone();
            self.lru.record_access(key);
            self.stats.record_hit();
            return Ok(value);
        }

        if options.stale_while_revalidate {
            let value = entry.value.clone();
            self.lru.record_access(key);
            self.stats.record_stale_hit();
            return Ok(value);
        }

        self.entries.remove(key);
        self.lru.forget(key);
        self.stats.record_expirations(1);
        self.stats.record_miss();
        self.stats.set_total_entries(self.entries.len());
        Err(CacheError::Expired(key.to_string()))
    }

    // == Delete ==
    /// Removes an entry by key. Idempotent.
    ///
    /// Returns whether an entry was actually removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.lru.forget(key);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    // == Clear ==
    /// Removes all entries. Used for full invalidation.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.set_total_entries(0);
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache, whether or not they are
    /// ever read again.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.entries.remove(&key);
            self.lru.forget(&key);
        }

        self.stats.record_expirations(count as u64);
        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
