//! Services for users, order items and order histories.
//!
//! The services sit between the HTTP layer and the store. They classify
//! failures into [`ServiceError`], apply the shared [`pagination`] policy and
//! keep the cross-entity rules:
//!
//! - an order history may only reference an existing, non-deleted user and
//!   order item;
//! - a user's `first_order` is stamped by their first order history and never
//!   changes afterwards;
//! - updating or deleting an order item drops the cached item listing when
//!   the cache is reachable.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use cache::DisabledCache;
//! use database::Database;
//! use orders::Services;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("sqlite:orders.db?mode=rwc").await?;
//! db.migrate().await?;
//!
//! let services = Services::new(db, Arc::new(DisabledCache));
//! let user = services.users.create("Alice").await?;
//! let history = services.order_histories.create(user.id, 1, "first order").await;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod order_history;
pub mod order_item;
pub mod pagination;
pub mod store;
pub mod user;

#[cfg(test)]
mod test_support;

pub use error::{ReferenceKind, Result, ServiceError};
pub use order_history::{OrderHistoryService, ReferenceCheck};
pub use order_item::OrderItemService;
pub use pagination::{Page, PageInfo, PageRequest};
pub use store::{OrderHistoryStore, OrderItemStore, UserStore};
pub use user::UserService;

use std::sync::Arc;

use cache::CacheInvalidator;
use database::Database;

/// All services, wired together.
///
/// Cloning is cheap; every service holds `Arc`'d handles.
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub order_items: OrderItemService,
    pub order_histories: OrderHistoryService,
}

impl Services {
    /// Build the services over one database.
    pub fn new(db: Database, cache: Arc<dyn CacheInvalidator>) -> Self {
        let db = Arc::new(db);
        Self::with_stores(db.clone(), db.clone(), db, cache)
    }

    /// Build the services over separate stores.
    pub fn with_stores(
        users: Arc<dyn UserStore>,
        order_items: Arc<dyn OrderItemStore>,
        order_histories: Arc<dyn OrderHistoryStore>,
        cache: Arc<dyn CacheInvalidator>,
    ) -> Self {
        let users = UserService::new(users);
        let order_items = OrderItemService::new(order_items, cache);
        let order_histories =
            OrderHistoryService::new(users.clone(), order_items.clone(), order_histories);

        Self {
            users,
            order_items,
            order_histories,
        }
    }
}
