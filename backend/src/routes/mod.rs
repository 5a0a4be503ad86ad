//! Route definitions for the Stock Ledger

use axum::{middleware, routing::get, routing::post, Router};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .route("/auth/login", post(handlers::login))
        // Protected routes
        .nest("/admin", admin_routes(state.clone()))
        .nest("/categories", category_routes(state.clone()))
        .nest("/products", product_routes(state.clone()))
        .nest("/counterparties", counterparty_routes(state.clone()))
        .nest("/operation-groups", operation_group_routes(state.clone()))
        .nest("/operations", operation_routes(state))
}

/// Admin index and entity configuration (protected)
fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::admin_index))
        .route("/:entity/config", get(handlers::admin_config))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Category routes (protected)
fn category_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/:category_id",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Product routes (protected)
fn product_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).post(handlers::create_product))
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route("/:product_id/stock", get(handlers::get_product_stock))
        .route("/:product_id/history", get(handlers::get_product_history))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Counterparty routes (protected)
fn counterparty_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_counterparties).post(handlers::create_counterparty),
        )
        .route(
            "/:counterparty_id",
            get(handlers::get_counterparty)
                .put(handlers::update_counterparty)
                .delete(handlers::delete_counterparty),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Operation group routes (protected)
fn operation_group_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_operation_groups).post(handlers::create_operation_group),
        )
        .route(
            "/:group_id",
            get(handlers::get_operation_group)
                .put(handlers::update_operation_group)
                .delete(handlers::delete_operation_group),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Operation routes (protected)
fn operation_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_operations).post(handlers::create_operation),
        )
        .route(
            "/:operation_id",
            get(handlers::get_operation)
                .put(handlers::update_operation)
                .delete(handlers::delete_operation),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
