//! Memoizer Module
//!
//! Wraps a function with its own bounded cache of results.

use std::fmt;
use std::marker::PhantomData;

use tracing::debug;

use crate::cache::{BoundedCache, CacheStats};
use crate::error::{MemoError, Result};
use crate::key::{CallKey, FnId, KeyDeriver, ToCallArgs};

// == Memoizer ==
/// A function paired with a private cache of its results.
///
/// Each call derives a key from the function identity and the arguments.
/// A cached result is returned as a clone; otherwise the function runs and
/// its result is stored, evicting the oldest entry when the cache is full.
///
/// # Example
/// ```
/// use memo_cache::Memoizer;
///
/// let mut add = Memoizer::new(|&(a, b): &(i32, i32)| a + b, 2).unwrap();
/// assert_eq!(add.call((1, 2)).unwrap(), 3);
/// assert_eq!(add.call((1, 2)).unwrap(), 3);
/// assert_eq!(add.stats().hits, 1);
/// ```
pub struct Memoizer<A, V, F> {
    /// Identity mixed into every key
    id: FnId,
    /// The wrapped function
    function: F,
    /// Results by call key
    cache: BoundedCache<CallKey, V>,
    /// Calls answered from the cache
    hits: u64,
    /// Calls that ran the function
    misses: u64,
    _args: PhantomData<fn(&A)>,
}

impl<A, V, F> Memoizer<A, V, F>
where
    A: ToCallArgs,
    V: Clone,
    F: FnMut(&A) -> V,
{
    // == Constructor ==
    /// Wraps `function` with a cache of at most `capacity` results.
    ///
    /// The function is identified by its type, which is unique per fn item
    /// and closure.
    pub fn new(function: F, capacity: i64) -> Result<Self>
    where
        F: 'static,
    {
        Self::with_id(FnId::of::<F>(), function, capacity)
    }

    /// Wraps `function` under an explicit identity.
    pub fn with_id(id: FnId, function: F, capacity: i64) -> Result<Self> {
        let cache = BoundedCache::new(capacity)?;
        Ok(Self {
            id,
            function,
            cache,
            hits: 0,
            misses: 0,
            _args: PhantomData,
        })
    }

    // == Call ==
    /// Returns the cached result for `args`, computing and storing it on a miss.
    ///
    /// # Errors
    /// Returns `KeyDerivation` if an argument cannot be rendered into the key;
    /// the function is not called in that case.
    pub fn call(&mut self, args: A) -> Result<V> {
        let key = KeyDeriver::derive(&self.id, &args.to_call_args())?;

        match self.cache.get(&key) {
            Ok(value) => {
                let value = value.clone();
                self.hits += 1;
                debug!("Cache hit for {}", key);
                return Ok(value);
            }
            Err(MemoError::KeyNotFound(_)) => {}
            Err(e) => return Err(e),
        }

        self.misses += 1;
        debug!("Cache miss for {}, computing", key);

        let value = (self.function)(&args);
        self.cache.put(key, value.clone());
        Ok(value)
    }

    // == Reset ==
    /// Drops every cached result. Hit and miss counters are kept.
    pub fn reset(&mut self) {
        self.cache.reset();
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.cache.stats();
        stats.hits = self.hits;
        stats.misses = self.misses;
        stats
    }

    pub fn id(&self) -> &FnId {
        &self.id
    }

    pub fn capacity(&self) -> usize {
        self.cache.capacity()
    }

    /// Number of cached results.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn cache(&self) -> &BoundedCache<CallKey, V> {
        &self.cache
    }
}

impl<A, V, F> fmt::Debug for Memoizer<A, V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoizer")
            .field("id", &self.id)
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish_non_exhaustive()
    }
}

// == Memoize ==
/// Shorthand for [`Memoizer::new`].
pub fn memoize<A, V, F>(function: F, capacity: i64) -> Result<Memoizer<A, V, F>>
where
    A: ToCallArgs,
    V: Clone,
    F: FnMut(&A) -> V + 'static,
{
    Memoizer::new(function, capacity)
}
