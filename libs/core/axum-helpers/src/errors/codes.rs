//! Type-safe error codes for API responses.
//!
//! This module provides a single source of truth for error codes used across
//! the application. Each error code includes:
//! - String representation for client consumption (e.g., "VALIDATION_ERROR")
//! - Integer code for logging and monitoring (e.g., 1001)
//! - Default human-readable message
//!
//! # Example
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! assert_eq!(code.default_message(), "Request validation failed");
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for API responses.
///
/// This enum provides a type-safe way to represent error codes across the application.
/// It combines string identifiers (for clients), integer codes (for monitoring), and
/// default messages (for consistency).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request validation failed
    ValidationError,

    /// Invalid UUID format in path or query parameter
    InvalidUuid,

    /// JSON extraction from request body failed
    JsonExtraction,

    /// Requested resource was not found
    NotFound,

    /// An unexpected internal server error occurred
    InternalError,

    /// Request was understood but rejected (e.g., duplicate email)
    BadRequest,

    // Database errors (2000-2999)
    /// A write was rejected by the server (e.g., unique index violation)
    DatabaseWrite,

    /// A server command failed
    DatabaseCommand,

    /// Network I/O with the database failed
    DatabaseIo,

    /// No suitable server could be selected
    DatabaseServerSelection,

    /// Authentication with the database failed
    DatabaseAuthentication,

    /// Failed to encode a document for the database
    DatabaseEncode,

    /// Failed to decode a document from the database
    DatabaseDecode,

    /// The driver rejected an argument or option
    DatabaseInvalidArgument,

    /// Unhandled database error
    DatabaseUnhandled,
}

impl ErrorCode {
    /// Get the string representation for client consumption.
    ///
    /// This returns a SCREAMING_SNAKE_CASE identifier that clients can use
    /// to programmatically handle specific error types.
    ///
    /// # Example
    ///
    /// ```rust
    /// use axum_helpers::errors::ErrorCode;
    ///
    /// assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
    /// assert_eq!(ErrorCode::NotFound.as_str(), "NOT_FOUND");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidUuid => "INVALID_UUID",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::DatabaseWrite => "DATABASE_WRITE",
            Self::DatabaseCommand => "DATABASE_COMMAND",
            Self::DatabaseIo => "DATABASE_IO",
            Self::DatabaseServerSelection => "DATABASE_SERVER_SELECTION",
            Self::DatabaseAuthentication => "DATABASE_AUTHENTICATION",
            Self::DatabaseEncode => "DATABASE_ENCODE",
            Self::DatabaseDecode => "DATABASE_DECODE",
            Self::DatabaseInvalidArgument => "DATABASE_INVALID_ARGUMENT",
            Self::DatabaseUnhandled => "DATABASE_UNHANDLED",
        }
    }

    /// Get the integer code for logging and monitoring.
    ///
    /// These codes are used in structured logs and metrics to identify error types.
    /// They are organized into ranges:
    /// - 1000-1999: Client errors
    /// - 2000-2999: Database errors
    ///
    /// # Example
    ///
    /// ```rust
    /// use axum_helpers::errors::ErrorCode;
    ///
    /// assert_eq!(ErrorCode::ValidationError.code(), 1001);
    /// assert_eq!(ErrorCode::DatabaseWrite.code(), 2001);
    /// ```
    pub fn code(&self) -> i32 {
        match self {
            // Client errors (1000-1999)
            Self::ValidationError => 1001,
            Self::InvalidUuid => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::BadRequest => 1012,

            // Database errors (2000-2999)
            Self::DatabaseWrite => 2001,
            Self::DatabaseCommand => 2002,
            Self::DatabaseIo => 2003,
            Self::DatabaseServerSelection => 2004,
            Self::DatabaseAuthentication => 2005,
            Self::DatabaseEncode => 2006,
            Self::DatabaseDecode => 2007,
            Self::DatabaseInvalidArgument => 2008,
            Self::DatabaseUnhandled => 2099,
        }
    }

    /// Get the default user-facing error message.
    ///
    /// Individual handlers can override these messages with more specific details.
    ///
    /// # Example
    ///
    /// ```rust
    /// use axum_helpers::errors::ErrorCode;
    ///
    /// assert_eq!(
    ///     ErrorCode::ValidationError.default_message(),
    ///     "Request validation failed"
    /// );
    /// ```
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidUuid => "Invalid UUID format",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::InternalError => "An internal server error occurred",
            Self::BadRequest => "Bad request",
            Self::DatabaseWrite => "Database write rejected",
            Self::DatabaseCommand => "Database command failed",
            Self::DatabaseIo => "Database I/O error",
            Self::DatabaseServerSelection => "No database server available",
            Self::DatabaseAuthentication => "Database authentication failed",
            Self::DatabaseEncode => "Failed to encode database request",
            Self::DatabaseDecode => "Failed to decode database response",
            Self::DatabaseInvalidArgument => "Invalid database argument",
            Self::DatabaseUnhandled => "Unhandled database error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_string_representation() {
        assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
        assert_eq!(ErrorCode::NotFound.as_str(), "NOT_FOUND");
        assert_eq!(ErrorCode::DatabaseWrite.as_str(), "DATABASE_WRITE");
    }

    #[test]
    fn test_error_code_integer_codes() {
        assert_eq!(ErrorCode::ValidationError.code(), 1001);
        assert_eq!(ErrorCode::DatabaseWrite.code(), 2001);
        assert_eq!(ErrorCode::BadRequest.code(), 1012);
    }

    #[test]
    fn test_error_code_messages() {
        assert_eq!(
            ErrorCode::ValidationError.default_message(),
            "Request validation failed"
        );
        assert_eq!(ErrorCode::NotFound.default_message(), "Resource not found");
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::ValidationError.to_string(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_error_code_serialization() {
        let code = ErrorCode::ValidationError;
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"VALIDATION_ERROR\"");
    }

    #[test]
    fn test_error_codes_are_unique() {
        let all = [
            ErrorCode::ValidationError,
            ErrorCode::InvalidUuid,
            ErrorCode::JsonExtraction,
            ErrorCode::NotFound,
            ErrorCode::InternalError,
            ErrorCode::BadRequest,
            ErrorCode::DatabaseWrite,
            ErrorCode::DatabaseCommand,
            ErrorCode::DatabaseIo,
            ErrorCode::DatabaseServerSelection,
            ErrorCode::DatabaseAuthentication,
            ErrorCode::DatabaseEncode,
            ErrorCode::DatabaseDecode,
            ErrorCode::DatabaseInvalidArgument,
            ErrorCode::DatabaseUnhandled,
        ];
        let codes: std::collections::HashSet<i32> = all.iter().map(ErrorCode::code).collect();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn test_error_code_deserialization() {
        let json = "\"VALIDATION_ERROR\"";
        let code: ErrorCode = serde_json::from_str(json).unwrap();
        assert_eq!(code, ErrorCode::ValidationError);
    }
}
