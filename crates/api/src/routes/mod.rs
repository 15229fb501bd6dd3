//! Route handlers for the REST API.

pub mod health;
pub mod order_histories;
pub mod order_items;
pub mod users;

use axum::extract::rejection::JsonRejection;
use axum::routing::get;
use axum::{Json, Router};
use orders::PageRequest;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Users
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/:id",
            get(users::get).put(users::update).delete(users::delete),
        )
        .route("/users/:id/order-histories", get(users::order_histories))
        // Order items
        .route("/order-items", get(order_items::list).post(order_items::create))
        .route(
            "/order-items/:id",
            get(order_items::get)
                .put(order_items::update)
                .delete(order_items::delete),
        )
        // Order histories
        .route(
            "/order-histories",
            get(order_histories::list).post(order_histories::create),
        )
        .route(
            "/order-histories/:id",
            get(order_histories::get)
                .put(order_histories::update)
                .delete(order_histories::delete),
        )
}

/// `?limit=&page=` on list endpoints. Kept as raw strings so bad values fall
/// back to the defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<String>,
    pub page: Option<String>,
}

impl PageQuery {
    pub fn request(&self) -> PageRequest {
        PageRequest::from_query(self.limit.as_deref(), self.page.as_deref())
    }
}

/// Parse a path id.
pub(crate) fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|err| ApiError::bad_request("Unknown ID", err))
}

/// Unwrap a JSON body, turning a rejection into a 400 envelope.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request("Invalid Request", rejection.body_text()))
}
