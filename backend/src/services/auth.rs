//! Authentication service: login, token issuance, administrator bootstrap

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use shared::User;

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub username: String,
    pub is_superuser: bool,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication tokens
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Successful login: the token and the account it was issued for
#[derive(Debug, Serialize)]
pub struct AuthSession {
    #[serde(flatten)]
    pub tokens: AuthTokens,
    pub user: User,
}

/// Result of the administrator bootstrap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapOutcome {
    Created(Uuid),
    AlreadyExists,
}

/// User row including the password hash
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    is_superuser: bool,
    is_active: bool,
}

/// Decode and validate a JWT token
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Invalid token: {}", e))
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
        }
    }

    /// Authenticate an administrator with username and password
    pub async fn login(&self, username: &str, password: &str) -> AppResult<AuthSession> {
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, is_superuser, is_active
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        let valid = verify(password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            tracing::info!(username = %user.username, "rejected login");
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AppError::Unauthorized {
                message: "Account is disabled".to_string(),
                message_ru: "Учётная запись отключена".to_string(),
            });
        }

        let account = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET last_login_at = NOW()
            WHERE id = $1
            RETURNING id, username, is_superuser, is_active, created_at, last_login_at
            "#,
        )
        .bind(user.id)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(username = %user.username, "login");
        let tokens = self.generate_token(user.id, &user.username, user.is_superuser)?;
        Ok(AuthSession {
            tokens,
            user: account,
        })
    }

    /// Create the administrator account unless that username already exists.
    ///
    /// Credentials are always supplied by the caller from configuration.
    pub async fn ensure_admin(&self, username: &str, password: &str) -> AppResult<BootstrapOutcome> {
        shared::validate_username(username).map_err(|m| AppError::invalid("username", m))?;
        shared::validate_password(password).map_err(|m| AppError::invalid("password", m))?;

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)",
        )
        .bind(username)
        .fetch_one(&self.db)
        .await?;

        if exists {
            tracing::info!(username, "administrator already initialized");
            return Ok(BootstrapOutcome::AlreadyExists);
        }

        let password_hash = hash_password(password)?;

        let user_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO users (username, password_hash, is_superuser, is_active)
            VALUES ($1, $2, TRUE, TRUE)
            ON CONFLICT (username) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(&password_hash)
        .fetch_optional(&self.db)
        .await?;

        match user_id {
            Some(id) => {
                tracing::info!(username, user_id = %id, "administrator account created");
                Ok(BootstrapOutcome::Created(id))
            }
            // Lost a race with a concurrent bootstrap
            None => Ok(BootstrapOutcome::AlreadyExists),
        }
    }

    /// Generate an access token
    fn generate_token(&self, user_id: Uuid, username: &str, is_superuser: bool) -> AppResult<AuthTokens> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.access_token_expiry);

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            is_superuser,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        Ok(AuthTokens {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }
}

/// Hash a password for storage
pub fn hash_password(password: &str) -> AppResult<String> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_for(secret: &str, exp_offset: i64) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            username: "admin".to_string(),
            is_superuser: true,
            exp: now + exp_offset,
            iat: now,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_valid_token() {
        let token = token_for("secret", 3600);
        let claims = decode_token(&token, "secret").unwrap();
        assert_eq!(claims.username, "admin");
        assert!(claims.is_superuser);
    }

    #[test]
    fn test_decode_rejects_wrong_secret() {
        let token = token_for("secret", 3600);
        assert!(decode_token(&token, "other").is_err());
    }

    #[test]
    fn test_decode_rejects_expired() {
        let token = token_for("secret", -3600);
        assert!(decode_token(&token, "secret").is_err());
    }

    #[test]
    fn test_hash_password_verifies() {
        let hashed = hash_password("correct horse").unwrap();
        assert!(verify("correct horse", &hashed).unwrap());
        assert!(!verify("wrong horse", &hashed).unwrap());
    }
}
