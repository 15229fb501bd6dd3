//! Fixtures and test doubles shared by the service tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cache::{CacheError, CacheInvalidator};
use chrono::{DateTime, Duration, Utc};
use database::{CreatedOrderHistory, Database, NewOrderItem, OrderHistory};

use crate::store::OrderHistoryStore;
use crate::Services;

/// Cache double that records what it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingCache {
    unreachable: bool,
    failing_delete: bool,
    pings: AtomicUsize,
    deleted: Mutex<Vec<String>>,
}

impl RecordingCache {
    pub fn reachable() -> Self {
        Self::default()
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn failing_delete() -> Self {
        Self {
            failing_delete: true,
            ..Self::default()
        }
    }

    pub fn pings(&self) -> usize {
        self.pings.load(Ordering::SeqCst)
    }

    pub fn deleted_keys(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl CacheInvalidator for RecordingCache {
    async fn ping(&self) -> cache::Result<()> {
        self.pings.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(CacheError::Disabled);
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> cache::Result<()> {
        if self.failing_delete {
            return Err(CacheError::Timeout(std::time::Duration::from_millis(1)));
        }
        self.deleted.lock().unwrap().push(key.to_string());
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// History store that counts inserts and list fetches before delegating.
pub struct CountingHistoryStore {
    inner: Database,
    creates: AtomicUsize,
    lists: AtomicUsize,
}

impl CountingHistoryStore {
    pub fn new(inner: Database) -> Self {
        Self {
            inner,
            creates: AtomicUsize::new(0),
            lists: AtomicUsize::new(0),
        }
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn lists(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderHistoryStore for CountingHistoryStore {
    async fn create_order_history(
        &self,
        user_id: i64,
        order_item_id: i64,
        descriptions: &str,
        created_at: DateTime<Utc>,
    ) -> database::Result<CreatedOrderHistory> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner
            .create_order_history(user_id, order_item_id, descriptions, created_at)
            .await
    }

    async fn update_order_history(
        &self,
        id: i64,
        user_id: i64,
        order_item_id: i64,
        descriptions: &str,
    ) -> database::Result<()> {
        self.inner
            .update_order_history(id, user_id, order_item_id, descriptions)
            .await
    }

    async fn get_order_history(&self, id: i64) -> database::Result<OrderHistory> {
        self.inner.get_order_history(id).await
    }

    async fn list_order_histories(
        &self,
        limit: i64,
        offset: i64,
    ) -> database::Result<Vec<OrderHistory>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.inner.list_order_histories(limit, offset).await
    }

    async fn list_order_histories_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> database::Result<Vec<OrderHistory>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.inner
            .list_order_histories_by_user(user_id, limit, offset)
            .await
    }

    async fn count_order_histories(&self, user_filter: i64) -> database::Result<i64> {
        self.inner.count_order_histories(user_filter).await
    }
}

pub async fn test_db() -> Database {
    let db = Database::connect_in_memory().await.unwrap();
    db.migrate().await.unwrap();
    db
}

/// Services over a fresh in-memory database and a reachable cache.
pub async fn test_services() -> (Services, Arc<RecordingCache>) {
    let cache = Arc::new(RecordingCache::reachable());
    let services = test_services_with_cache(cache.clone()).await;
    (services, cache)
}

pub async fn test_services_with_cache(cache: Arc<RecordingCache>) -> Services {
    Services::new(test_db().await, cache)
}

/// Services whose history store counts its calls.
pub async fn counting_services() -> (Services, Arc<CountingHistoryStore>) {
    let db = Arc::new(test_db().await);
    let histories = Arc::new(CountingHistoryStore::new((*db).clone()));
    let services = Services::with_stores(
        db.clone(),
        db,
        histories.clone(),
        Arc::new(RecordingCache::reachable()),
    );
    (services, histories)
}

pub fn sample_item(name: &str) -> NewOrderItem {
    NewOrderItem {
        name: name.to_string(),
        price: 1200,
        expired_at: Utc::now() + Duration::days(7),
    }
}
