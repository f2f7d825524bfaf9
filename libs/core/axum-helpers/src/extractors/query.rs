//! Query string extractor that reports failures as JSON errors.

use crate::errors::{ErrorCode, error_response};
use axum::{
    extract::{FromRequestParts, Query},
    http::{StatusCode, request::Parts},
    response::Response,
};
use serde::de::DeserializeOwned;

/// Drop-in replacement for [`axum::extract::Query`].
///
/// Malformed query strings (non-numeric values, duplicated keys, unknown
/// fields on `deny_unknown_fields` types) are rejected with a 400 carrying
/// an [`ErrorResponse`](crate::errors::ErrorResponse) body and
/// [`ErrorCode::BadRequest`] instead of axum's plain-text rejection.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::QueryParams;
///
/// async fn list(QueryParams(params): QueryParams<PageParams>) -> String {
///     format!("page {:?}", params.page)
/// }
/// ```
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(QueryParams(value)),
            Err(rejection) => {
                tracing::info!(
                    error_code = ErrorCode::BadRequest.code(),
                    "Query string rejected: {}",
                    rejection.body_text()
                );
                Err(error_response(
                    StatusCode::BAD_REQUEST,
                    rejection.body_text(),
                    ErrorCode::BadRequest,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorResponse;
    use axum::{Router, body::Body, http::Request, routing::get};
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    struct Paging {
        page: Option<u64>,
    }

    async fn page(QueryParams(params): QueryParams<Paging>) -> String {
        params.page.unwrap_or(1).to_string()
    }

    async fn call(uri: &str) -> (StatusCode, axum::body::Bytes) {
        let app = Router::new().route("/", get(page));
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        (status, response.into_body().collect().await.unwrap().to_bytes())
    }

    #[tokio::test]
    async fn test_query_parsed() {
        let (status, body) = call("/?page=3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"3");
    }

    #[tokio::test]
    async fn test_duplicated_param_is_json_bad_request() {
        let (status, body) = call("/?page=1&page=2").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error, "BAD_REQUEST");
        assert_eq!(error.code, ErrorCode::BadRequest.code());
        assert!(error.message.contains("page"));
    }

    #[tokio::test]
    async fn test_non_numeric_param_is_json_bad_request() {
        let (status, body) = call("/?page=two").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error, "BAD_REQUEST");
    }
}
