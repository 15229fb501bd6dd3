//! Database models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Whether a read should see soft-deleted rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadMode {
    /// Soft-deleted rows are treated as absent.
    #[default]
    ExcludeDeleted,
    /// Soft-deleted rows are returned like any other row.
    IncludeDeleted,
}

impl ReadMode {
    pub(crate) fn includes_deleted(self) -> bool {
        matches!(self, ReadMode::IncludeDeleted)
    }
}

/// A customer who places orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    /// Display name
    #[serde(rename = "name")]
    pub full_name: String,
    /// Creation time of the user's first order history. Set once, never moved.
    pub first_order: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether the user has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// A purchasable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub id: i64,
    pub name: String,
    /// Price in the smallest currency unit.
    pub price: i64,
    pub expired_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl OrderItem {
    /// Whether the item has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Writable fields of an order item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub name: String,
    pub price: i64,
    pub expired_at: DateTime<Utc>,
}

/// A record of a user ordering an item.
///
/// The history owns only the two foreign keys. `user` and `order_item` are
/// loaded views of the referenced rows, soft-deleted or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderHistory {
    pub id: i64,
    pub user_id: i64,
    pub order_item_id: i64,
    pub descriptions: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_item: Option<OrderItem>,
}

/// Result of inserting an order history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedOrderHistory {
    /// The stored history, without loaded references.
    pub history: OrderHistory,
    /// Whether this insert stamped the user's `first_order`.
    pub first_order_stamped: bool,
}
