//! Create the first administrator account
//!
//! Credentials are read from configuration only (`LEDGER__ADMIN__USERNAME`,
//! `LEDGER__ADMIN__PASSWORD` or the `[admin]` table). Running it again
//! leaves an existing account untouched.

use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use stock_ledger::{
    error::AppError,
    init_tracing,
    services::{auth::BootstrapOutcome, AuthService},
    Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let config = Config::load()?;

    let (username, password) = config.admin.credentials().ok_or_else(|| {
        AppError::Configuration(
            "set LEDGER__ADMIN__USERNAME and LEDGER__ADMIN__PASSWORD".to_string(),
        )
    })?;

    let db_pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .connect(&config.database.url)
        .await?;

    sqlx::migrate!("./migrations").run(&db_pool).await?;

    let auth_service = AuthService::new(db_pool, &config);
    match auth_service.ensure_admin(username, password).await? {
        BootstrapOutcome::Created(user_id) => {
            tracing::info!(username, %user_id, "administrator created")
        }
        BootstrapOutcome::AlreadyExists => {
            tracing::info!(username, "administrator already exists, nothing to do")
        }
    }

    Ok(())
}
