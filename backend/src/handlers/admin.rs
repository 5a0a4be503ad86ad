//! Admin index and per-entity configuration

use axum::{extract::Path, Json};
use serde::Serialize;

use crate::admin::{self, ModelAdmin};
use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use shared::Label;

/// One entry of the admin index
#[derive(Debug, Serialize)]
pub struct AdminEntry {
    pub slug: &'static str,
    pub verbose_name: Label,
    pub verbose_name_plural: Label,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct AdminIndex {
    pub username: String,
    pub entities: Vec<AdminEntry>,
}

/// List registered entities
pub async fn admin_index(current_user: CurrentUser) -> Json<AdminIndex> {
    let entities = admin::REGISTRY
        .iter()
        .map(|model| AdminEntry {
            slug: model.slug,
            verbose_name: model.verbose_name,
            verbose_name_plural: model.verbose_name_plural,
            url: format!("/api/v1/{}", model.slug),
        })
        .collect();

    Json(AdminIndex {
        username: current_user.0.username,
        entities,
    })
}

/// List/edit configuration of one entity
pub async fn admin_config(
    _current_user: CurrentUser,
    Path(entity): Path<String>,
) -> AppResult<Json<&'static ModelAdmin>> {
    admin::find(&entity)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Admin entity '{}'", entity)))
}
