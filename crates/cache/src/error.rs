//! Cache error types.

use thiserror::Error;

/// Errors that can occur while talking to the cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// No cache is configured.
    #[error("cache is disabled")]
    Disabled,

    /// The cache did not answer in time.
    #[error("cache timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Redis client error (connection, command, etc.)
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
