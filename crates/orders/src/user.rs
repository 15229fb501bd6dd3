//! User service.

use std::sync::Arc;

use database::{ReadMode, User};
use tracing::info;

use crate::error::Result;
use crate::pagination::{paginate, Page, PageRequest};
use crate::store::UserStore;

/// CRUD and paging over users.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Create a user. `first_order` always starts unset.
    pub async fn create(&self, full_name: &str) -> Result<User> {
        let user = self.store.create_user(full_name).await?;
        info!(user_id = user.id, "User created");
        Ok(user)
    }

    /// Rename a user. Fails with `NotFound` for missing or deleted users.
    pub async fn update(&self, id: i64, full_name: &str) -> Result<()> {
        self.get_by_id(id).await?;
        self.store.update_user(id, full_name).await?;
        info!(user_id = id, "User updated");
        Ok(())
    }

    /// Soft-delete a user.
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.get_by_id(id).await?;
        self.store.soft_delete_user(id).await?;
        info!(user_id = id, "User deleted");
        Ok(())
    }

    /// Get a non-deleted user.
    pub async fn get_by_id(&self, id: i64) -> Result<User> {
        Ok(self.store.get_user(id, ReadMode::ExcludeDeleted).await?)
    }

    pub async fn get_page(&self, limit: i64, offset: i64) -> Result<Vec<User>> {
        Ok(self.store.list_users(limit, offset).await?)
    }

    /// Count non-deleted users.
    pub async fn count(&self) -> Result<i64> {
        Ok(self.store.count_users().await?)
    }

    /// Fetch one page of users.
    pub async fn page(&self, request: PageRequest) -> Result<Page<User>> {
        let total = self.count().await?;
        paginate(request, total, |limit, offset| self.get_page(limit, offset)).await
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ServiceError;
    use crate::pagination::PageRequest;
    use crate::test_support::test_services;

    #[tokio::test]
    async fn test_create_and_get() {
        let (services, _) = test_services().await;

        let user = services.users.create("Alice").await.unwrap();
        assert!(user.first_order.is_none());

        let fetched = services.users.get_by_id(user.id).await.unwrap();
        assert_eq!(fetched, user);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_user() {
        let (services, _) = test_services().await;

        let result = services.users.update(42, "Nobody").await;
        assert!(matches!(result, Err(ServiceError::NotFound { id: 42, .. })));

        let result = services.users.delete(42).await;
        assert!(matches!(result, Err(ServiceError::NotFound { id: 42, .. })));
    }

    #[tokio::test]
    async fn test_deleted_user_is_absent() {
        let (services, _) = test_services().await;

        let user = services.users.create("Bob").await.unwrap();
        services.users.delete(user.id).await.unwrap();

        assert!(matches!(
            services.users.get_by_id(user.id).await,
            Err(ServiceError::NotFound { .. })
        ));
        assert!(matches!(
            services.users.update(user.id, "Bobby").await,
            Err(ServiceError::NotFound { .. })
        ));
        assert_eq!(services.users.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_page() {
        let (services, _) = test_services().await;
        for name in ["a", "b", "c"] {
            services.users.create(name).await.unwrap();
        }

        let page = services.users.page(PageRequest::new(2, 2)).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].full_name, "c");
        assert_eq!(page.info.total, 3);

        let page = services.users.page(PageRequest::new(10, 5)).await.unwrap();
        assert!(page.is_empty());
        assert_eq!(page.info.total, 3);
    }
}
