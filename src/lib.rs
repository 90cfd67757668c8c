//! Memo Cache - bounded memoization for plain Rust functions
//!
//! Provides a capacity-limited cache with FIFO eviction, structural call keys
//! derived from function identity and arguments, and memoizing wrappers.

pub mod cache;
pub mod config;
pub mod error;
pub mod key;
pub mod memo;

pub use cache::{BoundedCache, CacheStats};
pub use config::Config;
pub use error::{MemoError, Result};
pub use key::{CallArgs, CallKey, FnId, KeyDeriver, ToCallArgs};
pub use memo::{memoize, Memoizer, SharedMemoizer};
