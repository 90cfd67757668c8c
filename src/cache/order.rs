//! Insertion Order Module
//!
//! Tracks the order in which keys entered the cache, for FIFO eviction.

use std::collections::VecDeque;

// == Insertion Order ==
/// Records keys in the order they were first inserted.
///
/// Keys are stored in a VecDeque where:
/// - Front = Oldest insertion (next eviction victim)
/// - Back = Newest insertion
///
/// Reads never reorder keys, so eviction is first-in first-out.
#[derive(Debug)]
pub struct InsertionOrder<K> {
    /// Keys, oldest first
    order: VecDeque<K>,
}

impl<K> Default for InsertionOrder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> InsertionOrder<K> {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Push ==
    /// Appends a newly inserted key at the back.
    ///
    /// Callers must not push a key that is already tracked.
    pub fn push(&mut self, key: K) {
        self.order.push_back(key);
    }

    // == Evict Oldest ==
    /// Returns and removes the oldest key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<K> {
        self.order.pop_front()
    }

    // == Peek Oldest ==
    /// Returns the oldest key without removing it.
    pub fn peek_oldest(&self) -> Option<&K> {
        self.order.front()
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Iter ==
    /// Iterates keys from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
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
}
