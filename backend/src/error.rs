//! Error handling for the Stock Ledger
//!
//! Provides consistent error responses in English and Russian

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Postgres SQLSTATE for a foreign key violation
const FOREIGN_KEY_VIOLATION: &str = "23503";
/// Postgres SQLSTATE for a unique violation
const UNIQUE_VIOLATION: &str = "23505";
/// Postgres SQLSTATE for a check constraint violation
const CHECK_VIOLATION: &str = "23514";
/// Postgres SQLSTATE for a value too long for its column
const STRING_TOO_LONG: &str = "22001";

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
        message_ru: String,
    },

    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_ru: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Field is read-only: {0}")]
    ReadOnlyField(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    /// Field-level validation error from a shared validation message
    pub fn invalid(field: &str, message: &str) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.to_string(),
            message_ru: format!("Некорректное значение поля «{}»", field),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut fields: Vec<_> = field_errors.into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        match fields.first() {
            Some((field, errs)) => {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Invalid value".to_string());
                AppError::invalid(field, &message)
            }
            None => AppError::ValidationError(errors.to_string()),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_ru: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorDetail {
    fn new(code: &str, message_en: impl Into<String>, message_ru: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message_en: message_en.into(),
            message_ru: message_ru.into(),
            field: None,
        }
    }

    fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

/// Map a database error to a response, surfacing constraint violations
fn database_error(err: &sqlx::Error) -> (StatusCode, ErrorDetail) {
    if let sqlx::Error::RowNotFound = err {
        return (
            StatusCode::NOT_FOUND,
            ErrorDetail::new("NOT_FOUND", "Record not found", "Запись не найдена"),
        );
    }

    let db_err = err.as_database_error();
    let constraint = db_err.and_then(|e| e.constraint()).map(str::to_string);
    let detail = match db_err.and_then(|e| e.code()).as_deref() {
        Some(FOREIGN_KEY_VIOLATION) => Some((
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorDetail::new(
                "INVALID_REFERENCE",
                "The referenced record does not exist",
                "Связанная запись не существует",
            ),
        )),
        Some(UNIQUE_VIOLATION) => Some((
            StatusCode::CONFLICT,
            ErrorDetail::new(
                "DUPLICATE_ENTRY",
                "A record with these values already exists",
                "Запись с такими значениями уже существует",
            ),
        )),
        Some(STRING_TOO_LONG) => Some((
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorDetail::new(
                "VALUE_TOO_LONG",
                "A value is longer than its field allows",
                "Значение длиннее допустимого",
            ),
        )),
        Some(CHECK_VIOLATION) => Some((
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorDetail::new(
                "CONSTRAINT_VIOLATION",
                "A value is outside its allowed range",
                "Значение вне допустимого диапазона",
            ),
        )),
        _ => None,
    };

    match detail {
        Some((status, detail)) => match constraint {
            Some(constraint) => (status, detail.with_field(constraint)),
            None => (status, detail),
        },
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorDetail::new(
                "DATABASE_ERROR",
                "A database error occurred",
                "Ошибка базы данных",
            ),
        ),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new(
                    "INVALID_CREDENTIALS",
                    "Invalid username or password",
                    "Неверное имя пользователя или пароль",
                ),
            ),
            AppError::Unauthorized { message, message_ru } => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new("UNAUTHORIZED", message.clone(), message_ru.clone()),
            ),
            AppError::Validation {
                field,
                message,
                message_ru,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new("VALIDATION_ERROR", message.clone(), message_ru.clone())
                    .with_field(field.clone()),
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new(
                    "VALIDATION_ERROR",
                    msg.clone(),
                    format!("Некорректные данные: {}", msg),
                ),
            ),
            AppError::ReadOnlyField(field) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new(
                    "READ_ONLY_FIELD",
                    format!("Field '{}' is read-only", field),
                    format!("Поле «{}» доступно только для чтения", field),
                )
                .with_field(field.clone()),
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new(
                    "NOT_FOUND",
                    format!("{} not found", resource),
                    format!("{}: запись не найдена", resource),
                ),
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new(
                    "CONFIGURATION_ERROR",
                    format!("Configuration error: {}", msg),
                    format!("Ошибка конфигурации: {}", msg),
                ),
            ),
            AppError::DatabaseError(err) => database_error(err),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("INTERNAL_ERROR", msg.clone(), "Внутренняя ошибка сервера"),
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new(
                    "INTERNAL_ERROR",
                    "An internal server error occurred",
                    "Внутренняя ошибка сервера",
                ),
            ),
        };

        // Log the error for debugging
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("Product".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::ReadOnlyField("created_by".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::DatabaseError(sqlx::Error::PoolTimedOut)
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_row_not_found_is_404() {
        assert_eq!(
            AppError::DatabaseError(sqlx::Error::RowNotFound)
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_validator_errors_pick_first_field() {
        let mut errors = validator::ValidationErrors::new();
        let mut err = validator::ValidationError::new("name");
        err.message = Some("Name is required".into());
        errors.add("name", err);

        match AppError::from(errors) {
            AppError::Validation { field, message, .. } => {
                assert_eq!(field, "name");
                assert_eq!(message, "Name is required");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
