//! HTTP handlers for operation groups

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
use crate::services::operation_group::{
    CreateOperationGroupInput, OperationGroupDetail, OperationGroupFilter,
    OperationGroupListItem, OperationGroupService, UpdateOperationGroupInput,
};
use crate::services::DeletionSummary;
use crate::AppState;
use shared::{Action, PaginatedResponse, Pagination};

#[derive(Debug, Deserialize)]
pub struct ListOperationGroupsQuery {
    pub q: Option<String>,
    pub action: Option<Action>,
    pub counterparty_id: Option<Uuid>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// List operation groups with totals
pub async fn list_operation_groups(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<ListOperationGroupsQuery>,
) -> AppResult<Json<PaginatedResponse<OperationGroupListItem>>> {
    let pagination = Pagination::from_query(query.page, query.per_page);
    let filter = OperationGroupFilter {
        q: query.q,
        action: query.action,
        counterparty_id: query.counterparty_id,
    };
    let service = OperationGroupService::new(state.db);
    Ok(Json(service.list(&filter, &pagination).await?))
}

/// Create an operation group, optionally with its operations
pub async fn create_operation_group(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(payload): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let input: CreateOperationGroupInput = admin::OPERATION_GROUP.parse_form(payload)?;
    let service = OperationGroupService::new(state.db);
    let group = service.create(current_user.actor(), input).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

/// Get an operation group with its operations and totals
pub async fn get_operation_group(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(group_id): Path<Uuid>,
) -> AppResult<Json<OperationGroupDetail>> {
    let service = OperationGroupService::new(state.db);
    Ok(Json(service.get(group_id).await?))
}

/// Update an operation group
pub async fn update_operation_group(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(group_id): Path<Uuid>,
    Json(payload): Json<Value>,
) -> AppResult<Json<OperationGroupDetail>> {
    let input: UpdateOperationGroupInput = admin::OPERATION_GROUP.parse_form(payload)?;
    let service = OperationGroupService::new(state.db);
    let group = service.update(current_user.actor(), group_id, input).await?;
    Ok(Json(group))
}

/// Delete an operation group with its operations
pub async fn delete_operation_group(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(group_id): Path<Uuid>,
) -> AppResult<Json<DeletionSummary>> {
    let service = OperationGroupService::new(state.db);
    let summary = service.delete(current_user.actor(), group_id).await?;
    Ok(Json(summary))
}
