//! LRU Tracker Module
//!
//! Maintains access-recency order for eviction decisions.

use std::collections::VecDeque;

// == LRU Tracker ==
/// Tracks key access order for LRU eviction.
///
/// Keys are kept in a VecDeque ordered by recency:
/// - Front = least recently used (next eviction candidate)
/// - Back = most recently used
///
/// Recency order is equivalent to ranking entries by their last-access
/// timestamp, but stays deterministic when two accesses land on the same
/// millisecond.
#[derive(Debug, Default)]
pub struct LruTracker {
    order: VecDeque<String>,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record Access ==
    /// Marks a key as the most recently used.
    ///
    /// An existing occurrence is removed first, so each key appears at most
    /// once in the queue.
    pub fn record_access(&mut self, key: &str) {
        self.forget(key);
        self.order.push_back(key.to_string());
    }

    // == Forget ==
    /// Drops a key from the tracker. No-op if the key is not tracked.
    pub fn forget(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Pop LRU ==
    /// Removes and returns the least recently used key, or None if empty.
    pub fn pop_lru(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    // == Peek LRU ==
    /// Returns the least recently used key without removing it.
    pub fn peek_lru(&self) -> Option<&String> {
        self.order.front()
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // == Clear ==
    /// Forgets all tracked keys.
    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    #[allow(dead_code)]
    pub fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }
}
