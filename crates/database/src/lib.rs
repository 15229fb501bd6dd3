//! SQLite persistence layer for users, order items and order histories.
//!
//! This crate provides async database operations using SQLx with SQLite.
//! Users and order items are soft-deleted; order histories are permanent and
//! always read together with the user and item they reference.
//!
//! # Example
//!
//! ```no_run
//! use database::{user, Database, ReadMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:orders.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Create a user
//!     let created = user::create_user(db.pool(), "Alice").await?;
//!     let fetched = user::get_user(db.pool(), created.id, ReadMode::ExcludeDeleted).await?;
//!     assert_eq!(fetched.full_name, "Alice");
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod models;
pub mod order_history;
pub mod order_item;
pub mod user;

pub use error::{DatabaseError, Result};
pub use models::{CreatedOrderHistory, NewOrderItem, OrderHistory, OrderItem, ReadMode, User};

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Connect, retrying up to `attempts` times with `delay` between tries.
    ///
    /// Returns the last connection error once all attempts are used up.
    pub async fn connect_with_retry(
        url: &str,
        pool_size: u32,
        attempts: u32,
        delay: Duration,
    ) -> Result<Self> {
        let attempts = attempts.max(1);
        let mut attempt = 1;

        loop {
            match Self::connect_with_pool_size(url, pool_size).await {
                Ok(db) => return Ok(db),
                Err(err) if attempt < attempts => {
                    tracing::warn!(
                        attempt,
                        attempts,
                        error = %err,
                        "Database connection failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Open a private in-memory database.
    ///
    /// The pool holds exactly one connection that never expires, since every
    /// SQLite in-memory connection is its own database.
    pub async fn connect_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
