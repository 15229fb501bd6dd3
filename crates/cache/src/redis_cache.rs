//! Redis-backed invalidator.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tokio::sync::OnceCell;
use tracing::info;

use crate::error::{CacheError, Result};
use crate::CacheInvalidator;

/// Redis invalidator sharing one reconnecting multiplexed connection.
///
/// The connection is opened on first use, so a Redis server that is down at
/// startup does not prevent the API from starting.
#[derive(Clone)]
pub struct RedisCache {
    client: Client,
    connection: std::sync::Arc<OnceCell<ConnectionManager>>,
    timeout: Duration,
}

impl RedisCache {
    /// Default time allowed for connecting and for each command.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

    /// Create an invalidator for a `redis://` URL. Does not connect.
    pub fn open(url: &str) -> Result<Self> {
        Self::with_timeout(url, Self::DEFAULT_TIMEOUT)
    }

    /// Create an invalidator with a custom timeout.
    pub fn with_timeout(url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::open(url)?;
        Ok(Self {
            client,
            connection: std::sync::Arc::new(OnceCell::new()),
            timeout,
        })
    }

    async fn connection(&self) -> Result<ConnectionManager> {
        let conn = self
            .connection
            .get_or_try_init(|| async {
                let conn = self
                    .bounded(ConnectionManager::new(self.client.clone()))
                    .await?;
                info!("Connected to redis");
                Ok::<_, CacheError>(conn)
            })
            .await?;
        Ok(conn.clone())
    }

    async fn bounded<T>(
        &self,
        fut: impl std::future::Future<Output = redis::RedisResult<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(CacheError::from),
            Err(_) => Err(CacheError::Timeout(self.timeout)),
        }
    }
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("connected", &self.connection.initialized())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[async_trait]
impl CacheInvalidator for RedisCache {
    async fn ping(&self) -> Result<()> {
        let mut conn = self.connection().await?;
        let _: String = self.bounded(redis::cmd("PING").query_async(&mut conn)).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        let removed: i64 = self.bounded(conn.del(key)).await?;
        tracing::debug!(key, removed, "Invalidated cache key");
        Ok(())
    }

    fn name(&self) -> &str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_rejects_bad_url() {
        assert!(RedisCache::open("not a url").is_err());
    }

    #[tokio::test]
    async fn test_unreachable_server_fails_ping() {
        let cache =
            RedisCache::with_timeout("redis://127.0.0.1:1", Duration::from_millis(500)).unwrap();
        assert!(cache.ping().await.is_err());
        // Nothing was cached, so the next call tries again.
        assert!(cache.ping().await.is_err());
    }
}
