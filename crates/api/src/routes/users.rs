//! User routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use database::{OrderHistory, User};
use serde::Deserialize;

use crate::error::Result;
use crate::response::ApiResponse;
use crate::routes::{json_body, parse_id, PageQuery};
use crate::state::AppState;
use crate::validation::validate_name;

/// Body of create and update requests.
#[derive(Debug, Deserialize)]
pub struct UserRequest {
    pub name: String,
}

pub async fn create(
    State(state): State<AppState>,
    body: std::result::Result<Json<UserRequest>, JsonRejection>,
) -> Result<ApiResponse<User>> {
    let request = json_body(body)?;
    let name = validate_name("name", &request.name)?;

    let user = state.services.users.create(name).await?;
    Ok(ApiResponse::created(user))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<ApiResponse<Vec<User>>> {
    let page = state.services.users.page(query.request()).await?;
    Ok(ApiResponse::from_page(page))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<ApiResponse<User>> {
    let id = parse_id(&id)?;
    let user = state.services.users.get_by_id(id).await?;
    Ok(ApiResponse::ok(user))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Json<UserRequest>, JsonRejection>,
) -> Result<ApiResponse<()>> {
    let id = parse_id(&id)?;
    let request = json_body(body)?;
    let name = validate_name("name", &request.name)?;

    state.services.users.update(id, name).await?;
    Ok(ApiResponse::message(format!("UserID {} Has Been Updated", id)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>> {
    let id = parse_id(&id)?;
    state.services.users.delete(id).await?;
    Ok(ApiResponse::message(format!("UserID {} Has Been Deleted", id)))
}

/// Order histories of one user. An unknown user yields an empty page.
pub async fn order_histories(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<ApiResponse<Vec<OrderHistory>>> {
    let id = parse_id(&id)?;
    let page = state
        .services
        .order_histories
        .page_for_user(id, query.request())
        .await?;
    Ok(ApiResponse::from_page(page))
}
