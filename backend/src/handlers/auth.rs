//! Authentication handlers

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::auth::{AuthService, AuthSession};
use crate::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<AuthSession>> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let session = auth_service.login(body.username.trim(), &body.password).await?;
    Ok(Json(session))
}
