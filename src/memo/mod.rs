//! Memo Module
//!
//! Function wrappers that answer repeated calls from a bounded cache.

mod memoizer;
mod shared;

pub use memoizer::{memoize, Memoizer};
pub use shared::SharedMemoizer;
