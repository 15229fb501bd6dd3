//! Order item service.
//!
//! Every update and delete drops the cached order item listing. The cache is
//! probed first: an unreachable cache is skipped, but a failed delete on a
//! reachable one is returned to the caller.

use std::sync::Arc;

use cache::{CacheInvalidator, ORDER_ITEMS_ALL_KEY};
use database::{NewOrderItem, OrderItem, ReadMode};
use tracing::{debug, info};

use crate::error::Result;
use crate::pagination::{paginate, Page, PageRequest};
use crate::store::OrderItemStore;

/// CRUD and paging over order items.
#[derive(Clone)]
pub struct OrderItemService {
    store: Arc<dyn OrderItemStore>,
    cache: Arc<dyn CacheInvalidator>,
}

impl OrderItemService {
    pub fn new(store: Arc<dyn OrderItemStore>, cache: Arc<dyn CacheInvalidator>) -> Self {
        Self { store, cache }
    }

    pub async fn create(&self, item: &NewOrderItem) -> Result<OrderItem> {
        let created = self.store.create_order_item(item).await?;
        info!(order_item_id = created.id, "Order item created");
        Ok(created)
    }

    /// Overwrite name, price and expiry of a non-deleted item.
    pub async fn update(&self, id: i64, item: &NewOrderItem) -> Result<OrderItem> {
        self.get_by_id(id).await?;
        let updated = self.store.update_order_item(id, item).await?;
        info!(order_item_id = id, "Order item updated");

        self.invalidate_listing().await?;
        Ok(updated)
    }

    /// Soft-delete an item.
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.get_by_id(id).await?;
        self.store.soft_delete_order_item(id).await?;
        info!(order_item_id = id, "Order item deleted");

        self.invalidate_listing().await
    }

    /// Get a non-deleted item.
    pub async fn get_by_id(&self, id: i64) -> Result<OrderItem> {
        Ok(self.store.get_order_item(id, ReadMode::ExcludeDeleted).await?)
    }

    pub async fn get_page(&self, limit: i64, offset: i64) -> Result<Vec<OrderItem>> {
        Ok(self.store.list_order_items(limit, offset).await?)
    }

    /// Count non-deleted items.
    pub async fn count(&self) -> Result<i64> {
        Ok(self.store.count_order_items().await?)
    }

    /// Fetch one page of items.
    pub async fn page(&self, request: PageRequest) -> Result<Page<OrderItem>> {
        let total = self.count().await?;
        paginate(request, total, |limit, offset| self.get_page(limit, offset)).await
    }

    async fn invalidate_listing(&self) -> Result<()> {
        if let Err(err) = self.cache.ping().await {
            debug!(cache = self.cache.name(), error = %err, "Cache unreachable, skipping invalidation");
            return Ok(());
        }

        self.cache.delete(ORDER_ITEMS_ALL_KEY).await?;
        debug!(key = ORDER_ITEMS_ALL_KEY, "Invalidated order item listing");
        Ok(())
    }
}
