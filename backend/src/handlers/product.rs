//! HTTP handlers for products and their stock

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
use crate::services::product::{
    CreateProductInput, ProductDetail, ProductFilter, ProductListItem, ProductService,
    UpdateProductInput,
};
use crate::services::stock::{ProductStock, StockMovement, StockService};
use crate::services::DeletionSummary;
use crate::AppState;
use crate::models::Product;
use shared::{PaginatedResponse, Pagination};

#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    pub q: Option<String>,
    pub category_id: Option<Uuid>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

fn product_service(state: &AppState) -> ProductService {
    ProductService::new(state.db.clone(), state.config.media.url.clone())
}

/// List products with their remaining stock
pub async fn list_products(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<ListProductsQuery>,
) -> AppResult<Json<PaginatedResponse<ProductListItem>>> {
    let pagination = Pagination::from_query(query.page, query.per_page);
    let filter = ProductFilter {
        q: query.q,
        category_id: query.category_id,
    };
    let products = product_service(&state).list(&filter, &pagination).await?;
    Ok(Json(products))
}

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(payload): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let input: CreateProductInput = admin::PRODUCT.parse_form(payload)?;
    let product = product_service(&state)
        .create(current_user.actor(), input)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product
pub async fn get_product(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ProductDetail>> {
    Ok(Json(product_service(&state).get(product_id).await?))
}

/// Update a product
pub async fn update_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<Value>,
) -> AppResult<Json<Product>> {
    let input: UpdateProductInput = admin::PRODUCT.parse_form(payload)?;
    let product = product_service(&state)
        .update(current_user.actor(), product_id, input)
        .await?;
    Ok(Json(product))
}

/// Delete a product with its operations
pub async fn delete_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<DeletionSummary>> {
    let summary = product_service(&state)
        .delete(current_user.actor(), product_id)
        .await?;
    Ok(Json(summary))
}

/// Current stock of a product
pub async fn get_product_stock(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ProductStock>> {
    let service = StockService::new(state.db);
    Ok(Json(service.remaining(product_id).await?))
}

/// Movement history of a product with running balance
pub async fn get_product_history(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<StockMovement>>> {
    let service = StockService::new(state.db);
    Ok(Json(service.history(product_id).await?))
}
