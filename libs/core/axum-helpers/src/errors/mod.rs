pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mongodb::error::{ErrorKind, WriteFailure};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Standard error response structure.
///
/// This structure is returned for all error responses, providing consistent
/// error information to clients including
/// - `code`: Integer error code for logging/monitoring (e.g., 1004)
/// - `error`: Machine-readable error identifier (e.g., "NOT_FOUND")
/// - `message`: Human-readable error message
/// - `details`: Optional additional error details (e.g., validation errors)
///
/// # JSON Example
///
/// ```json
/// {
///   "code": 1012,
///   "error": "BAD_REQUEST",
///   "message": "Email already exists"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details (e.g., validation field errors)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }
}

/// Application error type that can be converted to HTTP responses.
///
/// Every variant renders as an [`ErrorResponse`] with a matching [`ErrorCode`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

type ErrorParts = (StatusCode, String, Option<serde_json::Value>, ErrorCode);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details, code): ErrorParts = match self {
            AppError::Database(e) => map_mongo_error(&e),
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    "JSON extraction error: {:?}",
                    e
                );
                (
                    StatusCode::BAD_REQUEST,
                    e.body_text(),
                    None,
                    ErrorCode::JsonExtraction,
                )
            }
            AppError::ValidationError(e) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Validation error: {:?}",
                    e
                );
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::ValidationError.default_message().to_string(),
                    Some(validation_details(&e)),
                    ErrorCode::ValidationError,
                )
            }
            AppError::BadRequest(msg) => {
                tracing::info!(error_code = ErrorCode::BadRequest.code(), "Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg, None, ErrorCode::BadRequest)
            }
            AppError::NotFound(msg) => {
                tracing::info!(
                    error_code = ErrorCode::NotFound.code(),
                    "Not found: {}",
                    msg
                );
                (StatusCode::NOT_FOUND, msg, None, ErrorCode::NotFound)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    msg
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalError.default_message().to_string(),
                    None,
                    ErrorCode::InternalError,
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code.code(),
            error: code.as_str().to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// `{ "<field>": [{ "code", "message", "params" }, ...], ... }`
fn validation_details(errors: &ValidationErrors) -> serde_json::Value {
    let fields = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let entries: Vec<serde_json::Value> = errors
                .iter()
                .map(|err| {
                    serde_json::json!({
                        "code": err.code,
                        "message": err.message,
                        "params": err.params,
                    })
                })
                .collect();
            (field.to_string(), serde_json::Value::Array(entries))
        })
        .collect::<serde_json::Map<_, _>>();

    serde_json::Value::Object(fields)
}

/// Maps a MongoDB driver error to HTTP response components.
///
/// Store failures are reported to the client as bad requests carrying the
/// server's own message; the error code identifies the failure class.
fn map_mongo_error(error: &mongodb::error::Error) -> ErrorParts {
    let (code, message) = match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => {
            (ErrorCode::DatabaseWrite, e.message.clone())
        }
        ErrorKind::Write(WriteFailure::WriteConcernError(e)) => {
            (ErrorCode::DatabaseWrite, e.message.clone())
        }
        ErrorKind::Command(e) => (ErrorCode::DatabaseCommand, e.message.clone()),
        ErrorKind::Io(_) => (ErrorCode::DatabaseIo, error.to_string()),
        ErrorKind::ServerSelection { .. } => {
            (ErrorCode::DatabaseServerSelection, error.to_string())
        }
        ErrorKind::Authentication { .. } => {
            (ErrorCode::DatabaseAuthentication, error.to_string())
        }
        ErrorKind::BsonSerialization(_) => (ErrorCode::DatabaseEncode, error.to_string()),
        ErrorKind::BsonDeserialization(_) => (ErrorCode::DatabaseDecode, error.to_string()),
        ErrorKind::InvalidArgument { .. } => {
            (ErrorCode::DatabaseInvalidArgument, error.to_string())
        }
        _ => (ErrorCode::DatabaseUnhandled, error.to_string()),
    };

    match code {
        ErrorCode::DatabaseWrite
        | ErrorCode::DatabaseCommand
        | ErrorCode::DatabaseEncode
        | ErrorCode::DatabaseInvalidArgument => {
            tracing::warn!(error_code = code.code(), "Database error: {:?}", error);
        }
        _ => {
            tracing::error!(error_code = code.code(), "Database error: {:?}", error);
        }
    }

    (StatusCode::BAD_REQUEST, message, None, code)
}

/// Helper function to create error responses.
///
/// # Example
///
/// ```rust,ignore
/// use axum_helpers::errors::{error_response, ErrorCode};
/// use axum::http::StatusCode;
///
/// let response = error_response(
///     StatusCode::BAD_REQUEST,
///     "Invalid input".to_string(),
///     ErrorCode::ValidationError,
/// );
/// ```
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    (status, Json(ErrorResponse::new(error_code, message))).into_response()
}
