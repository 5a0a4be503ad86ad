//! HTTP handlers for categories

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use super::ListQuery;
use crate::admin;
use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::category::{CategoryService, CreateCategoryInput, UpdateCategoryInput};
use crate::services::DeletionSummary;
use crate::AppState;
use crate::models::Category;
use shared::PaginatedResponse;

/// List categories
pub async fn list_categories(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<PaginatedResponse<Category>>> {
    let service = CategoryService::new(state.db);
    let categories = service.list(query.q.as_deref(), &query.pagination()).await?;
    Ok(Json(categories))
}

/// Create a category
pub async fn create_category(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(payload): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let input: CreateCategoryInput = admin::CATEGORY.parse_form(payload)?;
    let service = CategoryService::new(state.db);
    let category = service.create(current_user.actor(), input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Get a category
pub async fn get_category(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(category_id): Path<Uuid>,
) -> AppResult<Json<Category>> {
    let service = CategoryService::new(state.db);
    Ok(Json(service.get(category_id).await?))
}

/// Update a category
pub async fn update_category(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(category_id): Path<Uuid>,
    Json(payload): Json<Value>,
) -> AppResult<Json<Category>> {
    let input: UpdateCategoryInput = admin::CATEGORY.parse_form(payload)?;
    let service = CategoryService::new(state.db);
    let category = service
        .update(current_user.actor(), category_id, input)
        .await?;
    Ok(Json(category))
}

/// Delete a category with its products and their operations
pub async fn delete_category(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(category_id): Path<Uuid>,
) -> AppResult<Json<DeletionSummary>> {
    let service = CategoryService::new(state.db);
    let summary = service.delete(current_user.actor(), category_id).await?;
    Ok(Json(summary))
}
