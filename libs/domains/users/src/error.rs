use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

/// Message returned when an email is already taken by another user
pub const EMAIL_EXISTS: &str = "Email already exists";

/// Message returned when an id does not resolve to a user
pub const USER_NOT_FOUND: &str = "User not found";

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] mongodb::error::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

/// Convert UserError to AppError for standardized error responses
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => AppError::NotFound(USER_NOT_FOUND.to_string()),
            UserError::DuplicateEmail(_) => AppError::BadRequest(EMAIL_EXISTS.to_string()),
            UserError::Validation(msg) => AppError::BadRequest(msg),
            UserError::Database(e) => AppError::Database(e),
            UserError::PasswordHash(msg) => AppError::InternalServerError(msg),
            UserError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
