//! Cache Module
//!
//! Provides bounded in-memory storage with FIFO eviction.

mod order;
mod stats;
mod store;


// Re-export public types
pub use order::InsertionOrder;
pub use stats::CacheStats;
pub use store::BoundedCache;
