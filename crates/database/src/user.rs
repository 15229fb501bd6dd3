//! User CRUD operations.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{ReadMode, User};

const ENTITY: &str = "User";

/// Create a new user.
pub async fn create_user(pool: &SqlitePool, full_name: &str) -> Result<User> {
    let now = Utc::now();
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (full_name, created_at, updated_at)
        VALUES (?, ?, ?)
        RETURNING id, full_name, first_order, created_at, updated_at, deleted_at
        "#,
    )
    .bind(full_name)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Get a user by ID.
pub async fn get_user(pool: &SqlitePool, id: i64, mode: ReadMode) -> Result<User> {
    let sql = if mode.includes_deleted() {
        r#"
        SELECT id, full_name, first_order, created_at, updated_at, deleted_at
        FROM users
        WHERE id = ?
        "#
    } else {
        r#"
        SELECT id, full_name, first_order, created_at, updated_at, deleted_at
        FROM users
        WHERE id = ? AND deleted_at IS NULL
        "#
    };

    sqlx::query_as::<_, User>(sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found(ENTITY, id))
}

/// Update the name of an existing, non-deleted user.
pub async fn update_user(pool: &SqlitePool, id: i64, full_name: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET full_name = ?, updated_at = ?
        WHERE id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(full_name)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found(ENTITY, id));
    }

    Ok(())
}

/// Mark a user as deleted. The row stays in place for history joins.
pub async fn soft_delete_user(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE users
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

/// List non-deleted users, oldest first.
pub async fn list_users(pool: &SqlitePool, limit: i64, offset: i64) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, full_name, first_order, created_at, updated_at, deleted_at
        FROM users
        WHERE deleted_at IS NULL
        ORDER BY id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Count non-deleted users.
pub async fn count_users(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM users WHERE deleted_at IS NULL
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
