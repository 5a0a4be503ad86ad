//! HTTP handlers for operations

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::admin;
use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::operation::{
    CreateOperationInput, OperationFilter, OperationLine, OperationService, UpdateOperationInput,
};
use crate::services::DeletionSummary;
use crate::AppState;
use shared::{Action, PaginatedResponse, Pagination};

#[derive(Debug, Deserialize)]
pub struct ListOperationsQuery {
    pub q: Option<String>,
    pub product_id: Option<Uuid>,
    pub group_id: Option<Uuid>,
    pub action: Option<Action>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// List operations
pub async fn list_operations(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<ListOperationsQuery>,
) -> AppResult<Json<PaginatedResponse<OperationLine>>> {
    let pagination = Pagination::from_query(query.page, query.per_page);
    let filter = OperationFilter {
        q: query.q,
        product_id: query.product_id,
        group_id: query.group_id,
        action: query.action,
    };
    let service = OperationService::new(state.db);
    Ok(Json(service.list(&filter, &pagination).await?))
}

/// Create an operation in an existing group
pub async fn create_operation(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(payload): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let input: CreateOperationInput = admin::OPERATION.parse_form(payload)?;
    let service = OperationService::new(state.db);
    let operation = service.create(current_user.actor(), input).await?;
    Ok((StatusCode::CREATED, Json(operation)))
}

/// Get an operation
pub async fn get_operation(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(operation_id): Path<Uuid>,
) -> AppResult<Json<OperationLine>> {
    let service = OperationService::new(state.db);
    Ok(Json(service.get(operation_id).await?))
}

/// Update an operation
pub async fn update_operation(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(operation_id): Path<Uuid>,
    Json(payload): Json<Value>,
) -> AppResult<Json<OperationLine>> {
    let input: UpdateOperationInput = admin::OPERATION.parse_form(payload)?;
    let service = OperationService::new(state.db);
    let operation = service
        .update(current_user.actor(), operation_id, input)
        .await?;
    Ok(Json(operation))
}

/// Delete an operation
pub async fn delete_operation(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(operation_id): Path<Uuid>,
) -> AppResult<Json<DeletionSummary>> {
    let service = OperationService::new(state.db);
    let summary = service.delete(current_user.actor(), operation_id).await?;
    Ok(Json(summary))
}
