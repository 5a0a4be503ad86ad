//! Stock Ledger - Backend
//!
//! Inventory and transaction ledger: products by category, counterparties,
//! and debit/credit operations grouped into batches. Stock is derived from
//! the operation history on every query.

use axum::{response::Redirect, routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod admin;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod validation;

pub use config::Config;

/// Default log filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str =
    "stock_ledger=debug,ledger_server=debug,tower_http=debug,sqlx=warn";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
}

/// Install the global tracing subscriber
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes(state.clone()));

    // Uploaded images are served by the front web server outside development
    if state.config.is_development() {
        let media = &state.config.media;
        tracing::debug!(root = %media.root, url = %media.url, "serving media files");
        app = app.nest_service(&media.url, ServeDir::new(&media.root));
    }

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    )
    .with_state(state)
}

/// Root endpoint
async fn root() -> Redirect {
    Redirect::temporary("/api/v1/admin")
}
