//! JSON extractor with automatic validation using the validator crate.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor with automatic validation.
///
/// Validates the request body using the `validator` crate's `Validate` trait.
/// Returns structured validation errors if validation fails. Bodies that fail
/// to deserialize (syntax errors, unknown fields on `deny_unknown_fields`
/// types) are rejected with 400 as well.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::post;
/// use axum_helpers::extractors::ValidatedJson;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct CreateUser {
///     #[validate(length(min = 1))]
///     email: String,
/// }
///
/// async fn create_user(ValidatedJson(payload): ValidatedJson<CreateUser>) -> String {
///     format!("Creating user: {}", payload.email)
/// }
///
/// let app = Router::new().route("/users", post(create_user));
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        data.validate()
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(ValidatedJson(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        routing::post,
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    #[serde(deny_unknown_fields)]
    struct Payload {
        #[validate(length(min = 1))]
        email: String,
    }

    async fn accept(ValidatedJson(payload): ValidatedJson<Payload>) -> String {
        payload.email
    }

    async fn post_json(body: &'static str) -> StatusCode {
        let app = Router::new().route("/", post(accept));
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        app.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_valid_body() {
        assert_eq!(post_json(r#"{"email":"a@b.c"}"#).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_failed_validation_is_bad_request() {
        assert_eq!(post_json(r#"{"email":""}"#).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_field_is_bad_request() {
        assert_eq!(
            post_json(r#"{"email":"a@b.c","role":"admin"}"#).await,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        assert_eq!(post_json("{").await, StatusCode::BAD_REQUEST);
    }
}
