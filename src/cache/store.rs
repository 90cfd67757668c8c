//! Bounded Cache Module
//!
//! Main cache engine combining HashMap storage with insertion-order tracking
//! and FIFO eviction.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::debug;

use crate::cache::{CacheStats, InsertionOrder};
use crate::error::{MemoError, Result};

// == Bounded Cache ==
/// Capacity-limited key-value store with FIFO eviction.
///
/// `entries` and `order` always hold the same set of keys, and the number of
/// entries never exceeds `capacity`. Reads do not change eviction order.
#[derive(Debug)]
pub struct BoundedCache<K, V> {
    /// Key-value storage
    entries: HashMap<K, V>,
    /// Insertion order, oldest first
    order: InsertionOrder<K>,
    /// Eviction counter and capacity
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// # Errors
    /// Returns `InvalidCapacity` unless `capacity >= 1`.
    pub fn new(capacity: i64) -> Result<Self> {
        let capacity = usize::try_from(capacity)
            .ok()
            .filter(|&c| c >= 1)
            .ok_or(MemoError::InvalidCapacity(capacity))?;

        Ok(Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            stats: CacheStats::new(capacity),
            capacity,
        })
    }

    // == Get ==
    /// Retrieves the value stored under `key`.
    ///
    /// A miss is reported as `KeyNotFound` and leaves the cache untouched.
    pub fn get(&self, key: &K) -> Result<&V> {
        self.entries
            .get(key)
            .ok_or_else(|| MemoError::KeyNotFound(format!("{:?}", key)))
    }

    // == Put ==
    /// Stores a key-value pair.
    ///
    /// If the key already exists, only the value is replaced; its eviction
    /// position is kept. If the key is new and the cache is full, exactly one
    /// entry (the oldest inserted) is evicted first.
    pub fn put(&mut self, key: K, value: V) {
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            return;
        }

        if self.entries.len() >= self.capacity {
            if let Some(evicted_key) = self.order.evict_oldest() {
                self.entries.remove(&evicted_key);
                self.stats.record_eviction();
                debug!("Evicted oldest entry {:?}", evicted_key);
            }
        }

        self.order.push(key.clone());
        self.entries.insert(key, value);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Reset ==
    /// Removes every entry, keeping the capacity.
    pub fn reset(&mut self) {
        let dropped = self.entries.len();
        self.entries.clear();
        self.order.clear();
        self.stats.set_total_entries(0);
        debug!("Cache reset, {} entries dropped", dropped);
    }

    // == Contains ==
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    // == Keys ==
    /// Iterates resident keys from oldest to newest insertion.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }

    // == Peek Oldest ==
    /// Returns the key that the next over-capacity put would evict.
    pub fn peek_oldest(&self) -> Option<&K> {
        self.order.peek_oldest()
    }

    // == Stats ==
    /// Returns eviction and occupancy statistics.
    ///
    /// Hits and misses are counted by the caller that interprets lookups.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Capacity ==
    pub fn capacity(&self) -> usize {
        self.capacity
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

    /// Checks that `order` and `entries` describe the same key set.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        self.order.len() == self.entries.len()
            && self.order.iter().all(|k| self.entries.contains_key(k))
            && self.entries.len() <= self.capacity
    }
}
