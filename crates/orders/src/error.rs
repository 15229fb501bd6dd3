//! Error types for service operations.

use std::fmt;

use cache::CacheError;
use database::DatabaseError;
use thiserror::Error;

/// The side of an order history reference that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    User,
    OrderItem,
}

impl ReferenceKind {
    /// Field label used in client-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            ReferenceKind::User => "UserID",
            ReferenceKind::OrderItem => "OrderItemID",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::User => write!(f, "user"),
            ReferenceKind::OrderItem => write!(f, "order_item"),
        }
    }
}

/// Errors returned by the services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The entity does not exist or has been soft-deleted.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// An order history points at a user or order item that does not exist.
    #[error("referenced {kind} not found: {id}")]
    ReferenceNotFound { kind: ReferenceKind, id: i64 },

    /// The operation is never allowed.
    #[error("operation not allowed: {0}")]
    OperationForbidden(&'static str),

    /// Store failure.
    #[error(transparent)]
    Database(DatabaseError),

    /// Cache failure after the cache answered a ping.
    #[error("cache invalidation failed: {0}")]
    Cache(#[from] CacheError),
}

impl ServiceError {
    /// Whether this is an unclassified store or cache failure.
    pub fn is_internal(&self) -> bool {
        matches!(self, ServiceError::Database(_) | ServiceError::Cache(_))
    }
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity, id } => ServiceError::NotFound { entity, id },
            other => ServiceError::Database(other),
        }
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
