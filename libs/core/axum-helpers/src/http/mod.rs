//! HTTP middleware module.
//!
//! This module provides HTTP-level middleware for:
//! - CORS configuration
//! - Security headers
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::http::{create_cors_layer, origins_from_env, security_headers};
//!
//! let app = Router::new()
//!     .layer(axum::middleware::from_fn(security_headers))
//!     .layer(create_cors_layer(origins_from_env()?));
//! ```

pub mod cors;
pub mod security;

pub use cors::{CORS_ALLOWED_ORIGIN, create_cors_layer, origins_from_env, parse_origins};
pub use security::security_headers;
