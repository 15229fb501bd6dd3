//! Error types for the HTTP layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use orders::ServiceError;
use thiserror::Error;

use crate::response::ApiResponse;
use crate::validation::ValidationError;

/// Errors returned by handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Service failure.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Malformed request.
    #[error("{message}: {error}")]
    BadRequest { message: &'static str, error: String },
}

impl ApiError {
    pub fn bad_request(message: &'static str, error: impl ToString) -> Self {
        ApiError::BadRequest {
            message,
            error: error.to_string(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::bad_request("Invalid Request", err)
    }
}

/// Client-facing name of a store entity.
fn display_entity(entity: &str) -> &str {
    match entity {
        "OrderItem" => "Order Item",
        other => other,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, error) = match &self {
            ApiError::Service(ServiceError::ReferenceNotFound { kind, id }) => (
                StatusCode::NOT_FOUND,
                format!("{} {} Not Found or Deleted", kind.label(), id),
                None,
            ),
            ApiError::Service(ServiceError::NotFound { entity, id }) => {
                let message = if *entity == "OrderHistory" {
                    format!("Order History #{} Not Found", id)
                } else {
                    format!("{} #{} Not Found or Deleted", display_entity(entity), id)
                };
                (StatusCode::NOT_FOUND, message, None)
            }
            ApiError::Service(ServiceError::OperationForbidden(_)) => (
                StatusCode::FORBIDDEN,
                "Delete Transaction Not Allowed".to_string(),
                None,
            ),
            ApiError::Service(err) => {
                tracing::error!(error = %err, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                    Some(err.to_string()),
                )
            }
            ApiError::BadRequest { message, error } => (
                StatusCode::BAD_REQUEST,
                message.to_string(),
                Some(error.clone()),
            ),
        };

        ApiResponse::failure(status, message, error).into_response()
    }
}

/// Result type for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
