//! Order history routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use database::OrderHistory;
use serde::Deserialize;

use crate::error::Result;
use crate::response::ApiResponse;
use crate::routes::{json_body, parse_id, PageQuery};
use crate::state::AppState;
use crate::validation::{validate_id, validate_text, MAX_DESCRIPTION_LENGTH};

/// Body of create and update requests.
#[derive(Debug, Deserialize)]
pub struct OrderHistoryRequest {
    pub user_id: i64,
    pub order_item_id: i64,
    pub descriptions: String,
}

impl OrderHistoryRequest {
    fn validate(&self) -> Result<(i64, i64, &str)> {
        let user_id = validate_id("user_id", self.user_id)?;
        let order_item_id = validate_id("order_item_id", self.order_item_id)?;
        let descriptions = validate_text("descriptions", &self.descriptions, MAX_DESCRIPTION_LENGTH)?;
        Ok((user_id, order_item_id, descriptions))
    }
}

pub async fn create(
    State(state): State<AppState>,
    body: std::result::Result<Json<OrderHistoryRequest>, JsonRejection>,
) -> Result<ApiResponse<OrderHistory>> {
    let request = json_body(body)?;
    let (user_id, order_item_id, descriptions) = request.validate()?;

    let history = state
        .services
        .order_histories
        .create(user_id, order_item_id, descriptions)
        .await?;
    Ok(ApiResponse::created(history))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<ApiResponse<Vec<OrderHistory>>> {
    let page = state.services.order_histories.page(query.request()).await?;
    Ok(ApiResponse::from_page(page))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<OrderHistory>> {
    let id = parse_id(&id)?;
    let history = state.services.order_histories.get_by_id(id).await?;
    Ok(ApiResponse::ok(history))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Json<OrderHistoryRequest>, JsonRejection>,
) -> Result<ApiResponse<()>> {
    let id = parse_id(&id)?;
    let request = json_body(body)?;
    let (user_id, order_item_id, descriptions) = request.validate()?;

    state
        .services
        .order_histories
        .update(id, user_id, order_item_id, descriptions)
        .await?;
    Ok(ApiResponse::message(format!("OrderHistoryID {} Has Been Updated", id)))
}

/// Histories cannot be deleted; every id is refused with 403.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>> {
    let id = id.trim().parse::<i64>().unwrap_or_default();
    state.services.order_histories.delete(id)?;
    Ok(ApiResponse::message(format!("OrderHistoryID {} Has Been Deleted", id)))
}
