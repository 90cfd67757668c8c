//! Error types for the memoization cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Memo Error Enum ==
/// Unified error type for the cache, key derivation and memoizer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoError {
    /// Capacity passed at construction was not at least 1
    #[error("Invalid capacity: {0} (must be at least 1)")]
    InvalidCapacity(i64),

    /// Key not present in the cache (the normal miss signal)
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// An argument could not be rendered into a key component
    #[error("Cannot derive key from argument {argument}: {reason}")]
    KeyDerivation {
        /// `#<position>` for positional arguments, the name for keyword arguments
        argument: String,
        reason: String,
    },
}

impl MemoError {
    /// Returns true for the cache-miss variant.
    pub fn is_miss(&self) -> bool {
        matches!(self, MemoError::KeyNotFound(_))
    }
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, MemoError>;
