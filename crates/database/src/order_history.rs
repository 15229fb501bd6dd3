//! Order history persistence.
//!
//! Histories are never deleted. Reads join the referenced user and order item
//! without a soft-delete filter, so a history keeps showing what was ordered
//! and by whom after either side has been deleted.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::{CreatedOrderHistory, OrderHistory, OrderItem, User};

const ENTITY: &str = "OrderHistory";

const JOINED_SELECT: &str = r#"
    SELECT
        h.id, h.user_id, h.order_item_id, h.descriptions, h.created_at, h.updated_at,
        u.full_name AS user_full_name,
        u.first_order AS user_first_order,
        u.created_at AS user_created_at,
        u.updated_at AS user_updated_at,
        u.deleted_at AS user_deleted_at,
        i.name AS item_name,
        i.price AS item_price,
        i.expired_at AS item_expired_at,
        i.created_at AS item_created_at,
        i.updated_at AS item_updated_at,
        i.deleted_at AS item_deleted_at
    FROM order_histories h
    JOIN users u ON u.id = h.user_id
    JOIN order_items i ON i.id = h.order_item_id
"#;

#[derive(FromRow)]
struct JoinedRow {
    id: i64,
    user_id: i64,
    order_item_id: i64,
    descriptions: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    user_full_name: String,
    user_first_order: Option<DateTime<Utc>>,
    user_created_at: DateTime<Utc>,
    user_updated_at: DateTime<Utc>,
    user_deleted_at: Option<DateTime<Utc>>,
    item_name: String,
    item_price: i64,
    item_expired_at: DateTime<Utc>,
    item_created_at: DateTime<Utc>,
    item_updated_at: DateTime<Utc>,
    item_deleted_at: Option<DateTime<Utc>>,
}

impl From<JoinedRow> for OrderHistory {
    fn from(row: JoinedRow) -> Self {
        OrderHistory {
            id: row.id,
            user_id: row.user_id,
            order_item_id: row.order_item_id,
            descriptions: row.descriptions,
            created_at: row.created_at,
            updated_at: row.updated_at,
            user: Some(User {
                id: row.user_id,
                full_name: row.user_full_name,
                first_order: row.user_first_order,
                created_at: row.user_created_at,
                updated_at: row.user_updated_at,
                deleted_at: row.user_deleted_at,
            }),
            order_item: Some(OrderItem {
                id: row.order_item_id,
                name: row.item_name,
                price: row.item_price,
                expired_at: row.item_expired_at,
                created_at: row.item_created_at,
                updated_at: row.item_updated_at,
                deleted_at: row.item_deleted_at,
            }),
        }
    }
}

/// Insert an order history and stamp the user's first order.
///
/// Both writes share one transaction. The stamp is a single conditional
/// update that only matches a user whose `first_order` is still null, so two
/// concurrent first histories cannot both set it.
pub async fn create_order_history(
    pool: &SqlitePool,
    user_id: i64,
    order_item_id: i64,
    descriptions: &str,
    created_at: DateTime<Utc>,
) -> Result<CreatedOrderHistory> {
    let mut tx = pool.begin().await?;

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO order_histories (user_id, order_item_id, descriptions, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(order_item_id)
    .bind(descriptions)
    .bind(created_at)
    .bind(created_at)
    .fetch_one(&mut *tx)
    .await?;

    let stamped = sqlx::query(
        r#"
        UPDATE users
        SET first_order = ?
        WHERE id = ? AND first_order IS NULL
        "#,
    )
    .bind(created_at)
    .bind(user_id)
    .execute(&mut *tx)
    .await?
    .rows_affected()
        == 1;

    tx.commit().await?;

    if stamped {
        tracing::debug!(user_id, history_id = id, "Stamped first order");
    }

    Ok(CreatedOrderHistory {
        history: OrderHistory {
            id,
            user_id,
            order_item_id,
            descriptions: descriptions.to_string(),
            created_at,
            updated_at: created_at,
            user: None,
            order_item: None,
        },
        first_order_stamped: stamped,
    })
}

/// Replace the references and description of an order history.
pub async fn update_order_history(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
    order_item_id: i64,
    descriptions: &str,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE order_histories
        SET user_id = ?, order_item_id = ?, descriptions = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(user_id)
    .bind(order_item_id)
    .bind(descriptions)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found(ENTITY, id));
    }

    Ok(())
}

/// Get an order history with its user and order item loaded.
pub async fn get_order_history(pool: &SqlitePool, id: i64) -> Result<OrderHistory> {
    let sql = format!("{JOINED_SELECT} WHERE h.id = ?");

    sqlx::query_as::<_, JoinedRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(OrderHistory::from)
        .ok_or_else(|| DatabaseError::not_found(ENTITY, id))
}

/// List order histories, oldest first.
pub async fn list_order_histories(
    pool: &SqlitePool,
    limit: i64,
    offset: i64,
) -> Result<Vec<OrderHistory>> {
    let sql = format!("{JOINED_SELECT} ORDER BY h.id LIMIT ? OFFSET ?");

    let rows = sqlx::query_as::<_, JoinedRow>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(OrderHistory::from).collect())
}

/// List the order histories of one user, oldest first.
pub async fn list_order_histories_by_user(
    pool: &SqlitePool,
    user_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<OrderHistory>> {
    let sql = format!("{JOINED_SELECT} WHERE h.user_id = ? ORDER BY h.id LIMIT ? OFFSET ?");

    let rows = sqlx::query_as::<_, JoinedRow>(&sql)
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(OrderHistory::from).collect())
}

/// Count order histories.
///
/// A positive `user_filter` counts only that user's histories; zero or a
/// negative value counts all of them.
pub async fn count_order_histories(pool: &SqlitePool, user_filter: i64) -> Result<i64> {
    let count = if user_filter > 0 {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM order_histories WHERE user_id = ?
            "#,
        )
        .bind(user_filter)
        .fetch_one(pool)
        .await?
    } else {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM order_histories
            "#,
        )
        .fetch_one(pool)
        .await?
    };

    Ok(count)
}
