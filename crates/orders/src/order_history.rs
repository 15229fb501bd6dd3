//! Order history service.
//!
//! Creating a history validates both references through the user and order
//! item services, then inserts the row and stamps the user's first order in
//! one store call. Reads always carry the referenced user and item, even
//! after they have been soft-deleted. Histories cannot be deleted.

use std::sync::Arc;

use chrono::Utc;
use database::{OrderHistory, OrderItem, User};
use tracing::{info, warn};

use crate::error::{ReferenceKind, Result, ServiceError};
use crate::order_item::OrderItemService;
use crate::pagination::{paginate, Page, PageRequest};
use crate::store::OrderHistoryStore;
use crate::user::UserService;

/// Outcome of checking that a referenced entity exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceCheck<T> {
    Valid(T),
    NotFound(ReferenceKind),
}

impl<T> ReferenceCheck<T> {
    /// Turn a failed check into `ReferenceNotFound` for `id`.
    pub fn require(self, id: i64) -> Result<T> {
        match self {
            ReferenceCheck::Valid(value) => Ok(value),
            ReferenceCheck::NotFound(kind) => Err(ServiceError::ReferenceNotFound { kind, id }),
        }
    }
}

/// Orchestrates order histories across users and order items.
#[derive(Clone)]
pub struct OrderHistoryService {
    users: UserService,
    order_items: OrderItemService,
    store: Arc<dyn OrderHistoryStore>,
}

impl OrderHistoryService {
    pub fn new(
        users: UserService,
        order_items: OrderItemService,
        store: Arc<dyn OrderHistoryStore>,
    ) -> Self {
        Self {
            users,
            order_items,
            store,
        }
    }

    /// Check that a non-deleted user exists.
    pub async fn validate_user(&self, user_id: i64) -> Result<ReferenceCheck<User>> {
        match self.users.get_by_id(user_id).await {
            Ok(user) => Ok(ReferenceCheck::Valid(user)),
            Err(ServiceError::NotFound { .. }) => Ok(ReferenceCheck::NotFound(ReferenceKind::User)),
            Err(err) => Err(err),
        }
    }

    /// Check that a non-deleted order item exists.
    pub async fn validate_order_item(&self, order_item_id: i64) -> Result<ReferenceCheck<OrderItem>> {
        match self.order_items.get_by_id(order_item_id).await {
            Ok(item) => Ok(ReferenceCheck::Valid(item)),
            Err(ServiceError::NotFound { .. }) => {
                Ok(ReferenceCheck::NotFound(ReferenceKind::OrderItem))
            }
            Err(err) => Err(err),
        }
    }

    /// Record that a user ordered an item.
    ///
    /// The returned history carries the user and item that were validated.
    /// If this is the user's first history, the attached user already shows
    /// the new `first_order`.
    pub async fn create(
        &self,
        user_id: i64,
        order_item_id: i64,
        descriptions: &str,
    ) -> Result<OrderHistory> {
        let mut user = self.validate_user(user_id).await?.require(user_id)?;
        let order_item = self
            .validate_order_item(order_item_id)
            .await?
            .require(order_item_id)?;

        let created_at = Utc::now();
        let created = self
            .store
            .create_order_history(user_id, order_item_id, descriptions, created_at)
            .await?;

        if created.first_order_stamped {
            user.first_order = Some(created.history.created_at);
            info!(user_id, "Recorded first order");
        }

        let mut history = created.history;
        history.user = Some(user);
        history.order_item = Some(order_item);

        info!(history_id = history.id, user_id, order_item_id, "Order history created");
        Ok(history)
    }

    /// Replace the references and description of a history.
    ///
    /// Both new references must exist and not be deleted. The user's
    /// `first_order` is left alone.
    pub async fn update(
        &self,
        id: i64,
        user_id: i64,
        order_item_id: i64,
        descriptions: &str,
    ) -> Result<()> {
        self.get_by_id(id).await?;

        self.validate_user(user_id).await?.require(user_id)?;
        self.validate_order_item(order_item_id)
            .await?
            .require(order_item_id)?;

        self.store
            .update_order_history(id, user_id, order_item_id, descriptions)
            .await?;
        info!(history_id = id, user_id, order_item_id, "Order history updated");
        Ok(())
    }

    /// Histories are permanent; this always fails.
    pub fn delete(&self, id: i64) -> Result<()> {
        warn!(history_id = id, "Rejected order history deletion");
        Err(ServiceError::OperationForbidden("order history deletion"))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<OrderHistory> {
        Ok(self.store.get_order_history(id).await?)
    }

    pub async fn get_page(&self, limit: i64, offset: i64) -> Result<Vec<OrderHistory>> {
        Ok(self.store.list_order_histories(limit, offset).await?)
    }

    pub async fn get_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrderHistory>> {
        Ok(self
            .store
            .list_order_histories_by_user(user_id, limit, offset)
            .await?)
    }

    /// Count histories of one user, or of everyone when `user_filter <= 0`.
    pub async fn count(&self, user_filter: i64) -> Result<i64> {
        Ok(self.store.count_order_histories(user_filter).await?)
    }

    /// Fetch one page of all histories.
    pub async fn page(&self, request: PageRequest) -> Result<Page<OrderHistory>> {
        let total = self.count(0).await?;
        paginate(request, total, |limit, offset| self.get_page(limit, offset)).await
    }

    /// Fetch one page of a user's histories.
    pub async fn page_for_user(
        &self,
        user_id: i64,
        request: PageRequest,
    ) -> Result<Page<OrderHistory>> {
        let total = self.count(user_id).await?;
        paginate(request, total, |limit, offset| {
            self.get_by_user(user_id, limit, offset)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::PageRequest;
    use crate::test_support::{counting_services, sample_item, test_services};

    #[tokio::test]
    async fn test_create_attaches_references_and_stamps_first_order() {
        let (services, _) = test_services().await;
        let user = services.users.create("Alice").await.unwrap();
        let item = services.order_items.create(&sample_item("Coffee")).await.unwrap();

        let history = services
            .order_histories
            .create(user.id, item.id, "morning coffee")
            .await
            .unwrap();

        assert_eq!(history.user_id, user.id);
        assert_eq!(history.order_item.as_ref(), Some(&item));
        let attached = history.user.as_ref().unwrap();
        assert_eq!(attached.id, user.id);
        assert_eq!(attached.full_name, user.full_name);
        assert_eq!(attached.first_order, Some(history.created_at));

        let stored_user = services.users.get_by_id(user.id).await.unwrap();
        let stored = services.order_histories.get_by_id(history.id).await.unwrap();
        assert_eq!(stored_user.first_order, Some(stored.created_at));
    }

    #[tokio::test]
    async fn test_second_history_keeps_first_order() {
        let (services, _) = test_services().await;
        let user = services.users.create("Bob").await.unwrap();
        let item = services.order_items.create(&sample_item("Tea")).await.unwrap();

        let first = services.order_histories.create(user.id, item.id, "1").await.unwrap();
        let first_order = services.users.get_by_id(user.id).await.unwrap().first_order;
        assert!(first_order.is_some());

        let second = services.order_histories.create(user.id, item.id, "2").await.unwrap();
        assert_eq!(second.user.unwrap().first_order, first_order);

        // Editing the originating history doesn't move it either.
        let other = services.order_items.create(&sample_item("Juice")).await.unwrap();
        services
            .order_histories
            .update(first.id, user.id, other.id, "edited")
            .await
            .unwrap();
        assert_eq!(
            services.users.get_by_id(user.id).await.unwrap().first_order,
            first_order
        );
    }

    #[tokio::test]
    async fn test_concurrent_first_histories_stamp_once() {
        let (services, _) = test_services().await;
        let user = services.users.create("Carol").await.unwrap();
        let item = services.order_items.create(&sample_item("Milk")).await.unwrap();

        let histories = &services.order_histories;
        let (a, b) = tokio::join!(
            histories.create(user.id, item.id, "a"),
            histories.create(user.id, item.id, "b"),
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        let stamps: Vec<_> = [&a, &b]
            .iter()
            .filter(|h| h.user.as_ref().unwrap().first_order == Some(h.created_at))
            .map(|h| h.created_at)
            .collect();
        assert_eq!(stamps.len(), 1);

        let stored = services.users.get_by_id(user.id).await.unwrap();
        assert_eq!(stored.first_order, Some(stamps[0]));
    }

    #[tokio::test]
    async fn test_create_with_unknown_user_writes_nothing() {
        let (services, store) = counting_services().await;
        let item = services.order_items.create(&sample_item("Coffee")).await.unwrap();

        let result = services.order_histories.create(9999, item.id, "ghost").await;

        assert!(matches!(
            result,
            Err(ServiceError::ReferenceNotFound {
                kind: ReferenceKind::User,
                id: 9999
            })
        ));
        assert_eq!(store.creates(), 0);
        assert_eq!(services.order_histories.count(0).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_with_unknown_item() {
        let (services, _) = test_services().await;
        let user = services.users.create("Dave").await.unwrap();

        let result = services.order_histories.create(user.id, 404, "nothing").await;
        assert!(matches!(
            result,
            Err(ServiceError::ReferenceNotFound {
                kind: ReferenceKind::OrderItem,
                id: 404
            })
        ));

        // A failed create must not stamp anything.
        let user = services.users.get_by_id(user.id).await.unwrap();
        assert!(user.first_order.is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_deleted_references() {
        let (services, _) = test_services().await;
        let user = services.users.create("Eve").await.unwrap();
        let item = services.order_items.create(&sample_item("Bread")).await.unwrap();
        services.users.delete(user.id).await.unwrap();

        let result = services.order_histories.create(user.id, item.id, "x").await;
        assert!(matches!(
            result,
            Err(ServiceError::ReferenceNotFound {
                kind: ReferenceKind::User,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_reads_show_deleted_references() {
        let (services, _) = test_services().await;
        let user = services.users.create("Frank").await.unwrap();
        let item = services.order_items.create(&sample_item("Cheese")).await.unwrap();
        let history = services.order_histories.create(user.id, item.id, "x").await.unwrap();

        services.order_items.delete(item.id).await.unwrap();

        let read = services.order_histories.get_by_id(history.id).await.unwrap();
        let loaded = read.order_item.unwrap();
        assert_eq!(loaded.id, item.id);
        assert_eq!(loaded.name, "Cheese");
        assert!(matches!(
            services.order_items.get_by_id(item.id).await,
            Err(ServiceError::NotFound { .. })
        ));

        let page = services.order_histories.page(PageRequest::default()).await.unwrap();
        assert_eq!(page.items[0].order_item.as_ref().unwrap().name, "Cheese");
    }

    #[tokio::test]
    async fn test_update_revalidates_references() {
        let (services, _) = test_services().await;
        let user = services.users.create("Gina").await.unwrap();
        let other_user = services.users.create("Hank").await.unwrap();
        let item = services.order_items.create(&sample_item("Rice")).await.unwrap();
        let history = services.order_histories.create(user.id, item.id, "x").await.unwrap();

        services.users.delete(other_user.id).await.unwrap();
        let result = services
            .order_histories
            .update(history.id, other_user.id, item.id, "y")
            .await;
        assert!(matches!(
            result,
            Err(ServiceError::ReferenceNotFound {
                kind: ReferenceKind::User,
                ..
            })
        ));

        services.order_items.delete(item.id).await.unwrap();
        let result = services
            .order_histories
            .update(history.id, user.id, item.id, "y")
            .await;
        assert!(matches!(
            result,
            Err(ServiceError::ReferenceNotFound {
                kind: ReferenceKind::OrderItem,
                ..
            })
        ));

        let result = services.order_histories.update(777, user.id, item.id, "y").await;
        assert!(matches!(result, Err(ServiceError::NotFound { id: 777, .. })));
    }

    #[tokio::test]
    async fn test_delete_is_forbidden() {
        let (services, _) = test_services().await;
        let user = services.users.create("Ivy").await.unwrap();
        let item = services.order_items.create(&sample_item("Soap")).await.unwrap();
        let history = services.order_histories.create(user.id, item.id, "x").await.unwrap();

        for id in [history.id, 0, -5, 123_456] {
            assert!(matches!(
                services.order_histories.delete(id),
                Err(ServiceError::OperationForbidden(_))
            ));
        }
        assert!(services.order_histories.get_by_id(history.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_page_past_end_skips_fetch() {
        let (services, store) = counting_services().await;
        let user = services.users.create("Jack").await.unwrap();
        let item = services.order_items.create(&sample_item("Salt")).await.unwrap();
        for _ in 0..3 {
            services.order_histories.create(user.id, item.id, "x").await.unwrap();
        }

        let page = services
            .order_histories
            .page(PageRequest::new(10, 5))
            .await
            .unwrap();
        assert!(page.is_empty());
        assert_eq!(page.info.total, 3);
        assert_eq!(store.lists(), 0);

        let page = services
            .order_histories
            .page(PageRequest::new(10, 1))
            .await
            .unwrap();
        assert_eq!(page.info.show, 3);
        assert_eq!(store.lists(), 1);
    }

    #[tokio::test]
    async fn test_count_and_page_for_user() {
        let (services, _) = test_services().await;
        let alice = services.users.create("Alice").await.unwrap();
        let bob = services.users.create("Bob").await.unwrap();
        let item = services.order_items.create(&sample_item("Pen")).await.unwrap();

        for _ in 0..3 {
            services.order_histories.create(alice.id, item.id, "a").await.unwrap();
        }
        services.order_histories.create(bob.id, item.id, "b").await.unwrap();

        assert_eq!(services.order_histories.count(0).await.unwrap(), 4);
        assert_eq!(services.order_histories.count(-1).await.unwrap(), 4);
        assert_eq!(services.order_histories.count(alice.id).await.unwrap(), 3);

        let page = services
            .order_histories
            .page_for_user(alice.id, PageRequest::new(2, 2))
            .await
            .unwrap();
        assert_eq!(page.info.total, 3);
        assert_eq!(page.items.len(), 1);
        assert!(page.items.iter().all(|h| h.user_id == alice.id));
        assert!(page.items[0].user.is_some());
    }
}
