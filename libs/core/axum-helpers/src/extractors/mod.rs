//! Request extractors whose rejections render as [`ErrorResponse`](crate::errors::ErrorResponse) JSON.
//!
//! - [`UuidPath`]: `/{id}` segment parsed as a UUID (`INVALID_UUID` on failure)
//! - [`ValidatedJson`]: JSON body run through `validator` (`VALIDATION_ERROR` / `JSON_EXTRACTION`)
//! - [`QueryParams`]: query string deserialization (`BAD_REQUEST`)

pub mod query;
pub mod uuid_path;
pub mod validated_json;

pub use query::QueryParams;
pub use uuid_path::UuidPath;
pub use validated_json::ValidatedJson;
