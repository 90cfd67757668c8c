//! Shared Memoizer Module
//!
//! Thread-safe handle around a [`Memoizer`].

use std::sync::Arc;

use parking_lot::Mutex;

use crate::cache::CacheStats;
use crate::error::Result;
use crate::key::{FnId, ToCallArgs};
use crate::memo::Memoizer;

// == Shared Memoizer ==
/// Cloneable handle to one memoizer, shared across threads.
///
/// Each call holds the lock for the whole lookup, compute and store
/// sequence, so readers never see a half-finished eviction and equal
/// concurrent calls run the function once.
pub struct SharedMemoizer<A, V, F> {
    inner: Arc<Mutex<Memoizer<A, V, F>>>,
}

impl<A, V, F> Clone for SharedMemoizer<A, V, F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, V, F> From<Memoizer<A, V, F>> for SharedMemoizer<A, V, F> {
    fn from(memoizer: Memoizer<A, V, F>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(memoizer)),
        }
    }
}

impl<A, V, F> SharedMemoizer<A, V, F>
where
    A: ToCallArgs,
    V: Clone,
    F: FnMut(&A) -> V,
{
    /// Creates a shared memoizer; see [`Memoizer::new`].
    pub fn new(function: F, capacity: i64) -> Result<Self>
    where
        F: 'static,
    {
        Memoizer::new(function, capacity).map(Self::from)
    }

    // == Call ==
    pub fn call(&self, args: A) -> Result<V> {
        self.inner.lock().call(args)
    }

    // == Reset ==
    pub fn reset(&self) {
        self.inner.lock().reset();
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    pub fn id(&self) -> FnId {
        *self.inner.lock().id()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn test_shared_clones_share_cache() {
        let shared = SharedMemoizer::new(|&(x,): &(i32,)| x + 1, 4).unwrap();
        let other = shared.clone();

        assert_eq!(shared.call((1,)).unwrap(), 2);
        assert_eq!(other.call((1,)).unwrap(), 2);

        let stats = other.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(shared.id(), other.id());
    }

    #[test]
    fn test_shared_concurrent_calls_compute_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let shared = SharedMemoizer::new(
            move |&(x,): &(u32,)| {
                counter.fetch_add(1, Ordering::SeqCst);
                x * 10
            },
            8,
        )
        .unwrap();

        thread::scope(|s| {
            for _ in 0..8 {
                let handle = shared.clone();
                s.spawn(move || {
                    for x in 0..4 {
                        assert_eq!(handle.call((x,)).unwrap(), x * 10);
                    }
                });
            }
        });

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        let stats = shared.stats();
        assert_eq!(stats.misses, 4);
        assert_eq!(stats.hits, 28);
    }

    #[test]
    fn test_shared_reset() {
        let shared = SharedMemoizer::new(|&(x,): &(i32,)| x, 2).unwrap();

        shared.call((1,)).unwrap();
        shared.reset();

        assert_eq!(shared.stats().total_entries, 0);
        assert_eq!(shared.stats().capacity, 2);
    }
}
