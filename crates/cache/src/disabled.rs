//! Cache used when none is configured.

use async_trait::async_trait;

use crate::error::{CacheError, Result};
use crate::CacheInvalidator;

/// A cache that is never reachable.
///
/// `ping` always fails, so callers that probe first skip invalidation.
#[derive(Debug, Clone, Default)]
pub struct DisabledCache;

#[async_trait]
impl CacheInvalidator for DisabledCache {
    async fn ping(&self) -> Result<()> {
        Err(CacheError::Disabled)
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ORDER_ITEMS_ALL_KEY;

    #[tokio::test]
    async fn test_disabled_cache_is_unreachable() {
        let cache = DisabledCache;
        assert!(matches!(cache.ping().await, Err(CacheError::Disabled)));
        assert!(cache.delete(ORDER_ITEMS_ALL_KEY).await.is_ok());
    }
}
