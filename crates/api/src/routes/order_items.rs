//! Order item routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{Duration, Utc};
use database::{NewOrderItem, OrderItem};
use serde::Deserialize;

use crate::error::Result;
use crate::response::ApiResponse;
use crate::routes::{json_body, parse_id, PageQuery};
use crate::state::AppState;
use crate::validation::{validate_name, validate_range, ValidationError, MAX_EXPIRED_DAYS};

/// Body of create and update requests.
#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    pub name: String,
    pub price: i64,
    /// Shelf life in days from now.
    pub expired_days: i64,
}

impl OrderItemRequest {
    /// Validate and resolve the expiry against the current time.
    fn into_new_item(self) -> std::result::Result<NewOrderItem, ValidationError> {
        let name = validate_name("name", &self.name)?.to_string();
        let price = validate_range("price", self.price, 1, i64::MAX)?;
        let days = validate_range("expired_days", self.expired_days, 1, MAX_EXPIRED_DAYS)?;

        Ok(NewOrderItem {
            name,
            price,
            expired_at: Utc::now() + Duration::days(days),
        })
    }
}

pub async fn create(
    State(state): State<AppState>,
    body: std::result::Result<Json<OrderItemRequest>, JsonRejection>,
) -> Result<ApiResponse<OrderItem>> {
    let item = json_body(body)?.into_new_item()?;
    let created = state.services.order_items.create(&item).await?;
    Ok(ApiResponse::created(created))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<ApiResponse<Vec<OrderItem>>> {
    let page = state.services.order_items.page(query.request()).await?;
    Ok(ApiResponse::from_page(page))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<OrderItem>> {
    let id = parse_id(&id)?;
    let item = state.services.order_items.get_by_id(id).await?;
    Ok(ApiResponse::ok(item))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Json<OrderItemRequest>, JsonRejection>,
) -> Result<ApiResponse<OrderItem>> {
    let id = parse_id(&id)?;
    let item = json_body(body)?.into_new_item()?;
    let updated = state.services.order_items.update(id, &item).await?;
    Ok(ApiResponse::ok(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>> {
    let id = parse_id(&id)?;
    state.services.order_items.delete(id).await?;
    Ok(ApiResponse::message(format!("OrderItemID {} Has Been Deleted", id)))
}
