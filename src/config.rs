//! Configuration Module
//!
//! Loads settings for the demo binary from environment variables.

use std::env;

/// Capacity used when `MEMO_CAPACITY` is unset or unparsable
pub const DEFAULT_CAPACITY: i64 = 5;

/// Default tracing filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "memo_cache=debug";

/// Demo configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of cached results per memoized function.
    /// Kept signed so non-positive values reach the cache and are rejected there.
    pub capacity: i64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MEMO_CAPACITY` - Cached results per function (default: 5)
    pub fn from_env() -> Self {
        Self {
            capacity: env::var("MEMO_CAPACITY")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_CAPACITY),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}
