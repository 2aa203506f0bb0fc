//! Error types shared by the persistence boundary, the core services and the HTTP layer.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::utils::code_generator::CodeGenError;

/// Column protected by a uniqueness constraint in the link store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    ShortCode,
    LongUrl,
}

/// Failure reported by a persistence collaborator.
///
/// "Not found" is not an error: lookups return `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An insert violated a uniqueness constraint.
    #[error("unique constraint violation on {0:?}")]
    Conflict(UniqueField),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            match db.constraint() {
                Some("links_code_key") => return StoreError::Conflict(UniqueField::ShortCode),
                Some("links_long_url_key") => return StoreError::Conflict(UniqueField::LongUrl),
                _ => {}
            }
        }

        StoreError::Database(e)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Error payload returned to API clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Errors surfaced synchronously by link allocation and lookup.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The long URL has already been shortened.
    #[error("URL already shortened: {long_url}")]
    DuplicateUrl { long_url: String },

    /// No free short code was found within the retry bound.
    #[error("no unique short code found after {attempts} attempts")]
    CodeSpaceExhausted { attempts: usize },

    #[error("short link not found: {code}")]
    NotFound { code: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    RandomSource(#[from] CodeGenError),

    #[error("{message}")]
    Validation { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound { code: code.into() }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::DuplicateUrl { .. } => StatusCode::CONFLICT,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::CodeSpaceExhausted { .. }
            | AppError::Store(_)
            | AppError::RandomSource(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into its client-facing representation.
    ///
    /// Store and entropy failures keep their source out of the payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::DuplicateUrl { long_url } => (
                "duplicate_url",
                "URL has already been shortened".to_string(),
                json!({ "long_url": long_url }),
            ),
            AppError::CodeSpaceExhausted { attempts } => (
                "code_space_exhausted",
                "Failed to generate a unique short code".to_string(),
                json!({ "attempts": attempts }),
            ),
            AppError::NotFound { code } => (
                "not_found",
                "Short link not found".to_string(),
                json!({ "code": code }),
            ),
            AppError::Store(_) => ("internal_error", "Database error".to_string(), json!({})),
            AppError::RandomSource(_) => (
                "internal_error",
                "Random source unavailable".to_string(),
                json!({}),
            ),
            AppError::Validation { message, details } => {
                ("validation_error", message.clone(), details.clone())
            }
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut fields: Vec<&str> = field_errors.keys().map(|k| k.as_ref()).collect();
        fields.sort_unstable();

        AppError::bad_request("Invalid request", json!({ "fields": fields }))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}
