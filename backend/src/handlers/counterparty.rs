//! HTTP handlers for counterparties

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
use crate::services::counterparty::{
    CounterpartyService, CreateCounterpartyInput, UpdateCounterpartyInput,
};
use crate::services::DeletionSummary;
use crate::AppState;
use crate::models::Counterparty;
use shared::PaginatedResponse;

/// List counterparties
pub async fn list_counterparties(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<PaginatedResponse<Counterparty>>> {
    let service = CounterpartyService::new(state.db);
    let counterparties = service.list(query.q.as_deref(), &query.pagination()).await?;
    Ok(Json(counterparties))
}

/// Create a counterparty
pub async fn create_counterparty(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(payload): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let input: CreateCounterpartyInput = admin::COUNTERPARTY.parse_form(payload)?;
    let service = CounterpartyService::new(state.db);
    let counterparty = service.create(current_user.actor(), input).await?;
    Ok((StatusCode::CREATED, Json(counterparty)))
}

/// Get a counterparty
pub async fn get_counterparty(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(counterparty_id): Path<Uuid>,
) -> AppResult<Json<Counterparty>> {
    let service = CounterpartyService::new(state.db);
    Ok(Json(service.get(counterparty_id).await?))
}

/// Update a counterparty
pub async fn update_counterparty(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(counterparty_id): Path<Uuid>,
    Json(payload): Json<Value>,
) -> AppResult<Json<Counterparty>> {
    let input: UpdateCounterpartyInput = admin::COUNTERPARTY.parse_form(payload)?;
    let service = CounterpartyService::new(state.db);
    let counterparty = service
        .update(current_user.actor(), counterparty_id, input)
        .await?;
    Ok(Json(counterparty))
}

/// Delete a counterparty with its groups and their operations
pub async fn delete_counterparty(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(counterparty_id): Path<Uuid>,
) -> AppResult<Json<DeletionSummary>> {
    let service = CounterpartyService::new(state.db);
    let summary = service.delete(current_user.actor(), counterparty_id).await?;
    Ok(Json(summary))
}
