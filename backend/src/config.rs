//! Configuration management for the Stock Ledger
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with LEDGER_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,

    /// Media (product images) configuration
    pub media: MediaConfig,

    /// Bootstrap administrator, only used when both values are set
    #[serde(default)]
    pub admin: AdminBootstrapConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Seconds to wait for a pooled connection
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for signing JWT tokens
    pub secret: String,

    /// Access token expiration in seconds
    pub access_token_expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MediaConfig {
    /// Directory product images are stored in
    pub root: String,

    /// URL prefix images are served under
    pub url: String,
}

/// Credentials for the first administrator.
///
/// There are no compiled-in defaults: set `LEDGER__ADMIN__USERNAME` and
/// `LEDGER__ADMIN__PASSWORD` (or the `[admin]` table) to bootstrap.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AdminBootstrapConfig {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl AdminBootstrapConfig {
    /// Both credentials, when configured
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("LEDGER_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("jwt.access_token_expiry", 28800)?
            .set_default("media.root", "media")?
            .set_default("media.url", "/media")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (LEDGER_ prefix)
            .add_source(
                Environment::with_prefix("LEDGER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_credentials_require_both() {
        let none = AdminBootstrapConfig::default();
        assert!(none.credentials().is_none());

        let half = AdminBootstrapConfig {
            username: Some("root".into()),
            password: None,
        };
        assert!(half.credentials().is_none());

        let blank = AdminBootstrapConfig {
            username: Some("root".into()),
            password: Some(String::new()),
        };
        assert!(blank.credentials().is_none());

        let full = AdminBootstrapConfig {
            username: Some("root".into()),
            password: Some("s3cret-pass".into()),
        };
        assert_eq!(full.credentials(), Some(("root", "s3cret-pass")));
    }
}
