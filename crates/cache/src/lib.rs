//! Cache invalidation for the orders API.
//!
//! Services never read through this crate. They only drop cached keys after a
//! mutation, and only when the cache answers a liveness probe.
//!
//! # Example
//!
//! ```no_run
//! use cache::{CacheInvalidator, RedisCache, ORDER_ITEMS_ALL_KEY};
//!
//! # async fn example() -> Result<(), cache::CacheError> {
//! let cache = RedisCache::open("redis://127.0.0.1:6379")?;
//!
//! if cache.ping().await.is_ok() {
//!     cache.delete(ORDER_ITEMS_ALL_KEY).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod disabled;
pub mod error;
pub mod redis_cache;

pub use disabled::DisabledCache;
pub use error::{CacheError, Result};
pub use redis_cache::RedisCache;

use async_trait::async_trait;

/// Key holding the cached listing of all order items.
pub const ORDER_ITEMS_ALL_KEY: &str = "order_items:all";

/// A cache that can be probed and have keys removed.
///
/// Implementations are shared by every request, so they must be usable
/// concurrently without outside locking.
#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    /// Check that the cache is reachable.
    async fn ping(&self) -> Result<()>;

    /// Remove a key. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Short name for logs.
    fn name(&self) -> &str;
}
