//! Order item CRUD operations.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{NewOrderItem, OrderItem, ReadMode};

const ENTITY: &str = "OrderItem";

/// Create a new order item.
pub async fn create_order_item(pool: &SqlitePool, item: &NewOrderItem) -> Result<OrderItem> {
    let now = Utc::now();
    let created = sqlx::query_as::<_, OrderItem>(
        r#"
        INSERT INTO order_items (name, price, expired_at, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, name, price, expired_at, created_at, updated_at, deleted_at
        "#,
    )
    .bind(&item.name)
    .bind(item.price)
    .bind(item.expired_at)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(created)
}

/// Get an order item by ID.
pub async fn get_order_item(pool: &SqlitePool, id: i64, mode: ReadMode) -> Result<OrderItem> {
    let sql = if mode.includes_deleted() {
        r#"
        SELECT id, name, price, expired_at, created_at, updated_at, deleted_at
        FROM order_items
        WHERE id = ?
        "#
    } else {
        r#"
        SELECT id, name, price, expired_at, created_at, updated_at, deleted_at
        FROM order_items
        WHERE id = ? AND deleted_at IS NULL
        "#
    };

    sqlx::query_as::<_, OrderItem>(sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found(ENTITY, id))
}

/// Overwrite the writable fields of a non-deleted order item.
pub async fn update_order_item(pool: &SqlitePool, id: i64, item: &NewOrderItem) -> Result<OrderItem> {
    sqlx::query_as::<_, OrderItem>(
        r#"
        UPDATE order_items
        SET name = ?, price = ?, expired_at = ?, updated_at = ?
        WHERE id = ? AND deleted_at IS NULL
        RETURNING id, name, price, expired_at, created_at, updated_at, deleted_at
        "#,
    )
    .bind(&item.name)
    .bind(item.price)
    .bind(item.expired_at)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::not_found(ENTITY, id))
}

/// Mark an order item as deleted.
pub async fn soft_delete_order_item(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE order_items
        SET deleted_at = ?
        WHERE id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found(ENTITY, id));
    }

    Ok(())
}

/// List non-deleted order items, oldest first.
pub async fn list_order_items(pool: &SqlitePool, limit: i64, offset: i64) -> Result<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(
        r#"
        SELECT id, name, price, expired_at, created_at, updated_at, deleted_at
        FROM order_items
        WHERE deleted_at IS NULL
        ORDER BY id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

/// Count non-deleted order items.
pub async fn count_order_items(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM order_items WHERE deleted_at IS NULL
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
