//! Persistence ports used by the services.
//!
//! Abstracted so the services can run against SQLite or a test double.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::{
    order_history, order_item, user, CreatedOrderHistory, Database, NewOrderItem, OrderHistory,
    OrderItem, ReadMode, Result, User,
};

/// User persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, full_name: &str) -> Result<User>;
    async fn update_user(&self, id: i64, full_name: &str) -> Result<()>;
    async fn get_user(&self, id: i64, mode: ReadMode) -> Result<User>;
    async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<User>>;
    async fn soft_delete_user(&self, id: i64) -> Result<()>;
    async fn count_users(&self) -> Result<i64>;
}

/// Order item persistence.
#[async_trait]
pub trait OrderItemStore: Send + Sync {
    async fn create_order_item(&self, item: &NewOrderItem) -> Result<OrderItem>;
    async fn update_order_item(&self, id: i64, item: &NewOrderItem) -> Result<OrderItem>;
    async fn get_order_item(&self, id: i64, mode: ReadMode) -> Result<OrderItem>;
    async fn list_order_items(&self, limit: i64, offset: i64) -> Result<Vec<OrderItem>>;
    async fn soft_delete_order_item(&self, id: i64) -> Result<()>;
    async fn count_order_items(&self) -> Result<i64>;
}

/// Order history persistence.
///
/// There is no delete: histories are permanent.
#[async_trait]
pub trait OrderHistoryStore: Send + Sync {
    /// Insert a history and, in the same write, stamp the user's first order
    /// if it is still unset.
    async fn create_order_history(
        &self,
        user_id: i64,
        order_item_id: i64,
        descriptions: &str,
        created_at: DateTime<Utc>,
    ) -> Result<CreatedOrderHistory>;

    async fn update_order_history(
        &self,
        id: i64,
        user_id: i64,
        order_item_id: i64,
        descriptions: &str,
    ) -> Result<()>;

    /// Get a history with its references loaded, deleted or not.
    async fn get_order_history(&self, id: i64) -> Result<OrderHistory>;

    async fn list_order_histories(&self, limit: i64, offset: i64) -> Result<Vec<OrderHistory>>;

    async fn list_order_histories_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrderHistory>>;

    /// Count histories; a non-positive `user_filter` counts all of them.
    async fn count_order_histories(&self, user_filter: i64) -> Result<i64>;
}

#[async_trait]
impl UserStore for Database {
    async fn create_user(&self, full_name: &str) -> Result<User> {
        user::create_user(self.pool(), full_name).await
    }

    async fn update_user(&self, id: i64, full_name: &str) -> Result<()> {
        user::update_user(self.pool(), id, full_name).await
    }

    async fn get_user(&self, id: i64, mode: ReadMode) -> Result<User> {
        user::get_user(self.pool(), id, mode).await
    }

    async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<User>> {
        user::list_users(self.pool(), limit, offset).await
    }

    async fn soft_delete_user(&self, id: i64) -> Result<()> {
        user::soft_delete_user(self.pool(), id).await
    }

    async fn count_users(&self) -> Result<i64> {
        user::count_users(self.pool()).await
    }
}

#[async_trait]
impl OrderItemStore for Database {
    async fn create_order_item(&self, item: &NewOrderItem) -> Result<OrderItem> {
        order_item::create_order_item(self.pool(), item).await
    }

    async fn update_order_item(&self, id: i64, item: &NewOrderItem) -> Result<OrderItem> {
        order_item::update_order_item(self.pool(), id, item).await
    }

    async fn get_order_item(&self, id: i64, mode: ReadMode) -> Result<OrderItem> {
        order_item::get_order_item(self.pool(), id, mode).await
    }

    async fn list_order_items(&self, limit: i64, offset: i64) -> Result<Vec<OrderItem>> {
        order_item::list_order_items(self.pool(), limit, offset).await
    }

    async fn soft_delete_order_item(&self, id: i64) -> Result<()> {
        order_item::soft_delete_order_item(self.pool(), id).await
    }

    async fn count_order_items(&self) -> Result<i64> {
        order_item::count_order_items(self.pool()).await
    }
}

#[async_trait]
impl OrderHistoryStore for Database {
    async fn create_order_history(
        &self,
        user_id: i64,
        order_item_id: i64,
        descriptions: &str,
        created_at: DateTime<Utc>,
    ) -> Result<CreatedOrderHistory> {
        order_history::create_order_history(
            self.pool(),
            user_id,
            order_item_id,
            descriptions,
            created_at,
        )
        .await
    }

    async fn update_order_history(
        &self,
        id: i64,
        user_id: i64,
        order_item_id: i64,
        descriptions: &str,
    ) -> Result<()> {
        order_history::update_order_history(self.pool(), id, user_id, order_item_id, descriptions)
            .await
    }

    async fn get_order_history(&self, id: i64) -> Result<OrderHistory> {
        order_history::get_order_history(self.pool(), id).await
    }

    async fn list_order_histories(&self, limit: i64, offset: i64) -> Result<Vec<OrderHistory>> {
        order_history::list_order_histories(self.pool(), limit, offset).await
    }

    async fn list_order_histories_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrderHistory>> {
        order_history::list_order_histories_by_user(self.pool(), user_id, limit, offset).await
    }

    async fn count_order_histories(&self, user_filter: i64) -> Result<i64> {
        order_history::count_order_histories(self.pool(), user_filter).await
    }
}
