//! JSON envelope wrapped around every response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use orders::{Page, PageInfo};
use serde::Serialize;

/// Message for a page with no rows.
pub const ZERO_DATA: &str = "Zero Data";

/// Response body: `{status, message, error?, data?, page?}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageInfo>,
}

impl<T: Serialize> ApiResponse<T> {
    fn new(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            error: None,
            data,
            page: None,
        }
    }

    /// 200 with a payload.
    pub fn ok(data: T) -> Self {
        Self::new(StatusCode::OK, "OK", Some(data))
    }

    /// 201 with the created record.
    pub fn created(data: T) -> Self {
        Self::new(StatusCode::CREATED, "Created", Some(data))
    }
}

impl ApiResponse<()> {
    /// 200 with only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, message, None)
    }

    /// An error body.
    pub fn failure(status: StatusCode, message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            error,
            ..Self::new(status, message, None)
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// 200 with one page of rows and its metadata.
    pub fn from_page(page: Page<T>) -> Self {
        let message = if page.is_empty() { ZERO_DATA } else { "OK" };
        Self {
            page: Some(page.info),
            ..Self::new(StatusCode::OK, message, Some(page.items))
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}
