//! Database error types.

use thiserror::Error;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLx error (connection, query, etc.)
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Record not found, or soft-deleted when read in the default mode
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },
}

impl DatabaseError {
    pub(crate) fn not_found(entity: &'static str, id: i64) -> Self {
        DatabaseError::NotFound { entity, id }
    }

    /// Whether this error means the requested row does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound { .. })
    }
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
