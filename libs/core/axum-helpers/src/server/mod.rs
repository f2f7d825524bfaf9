//! Server infrastructure module.
//!
//! This module provides:
//! - Router setup with OpenAPI documentation
//! - Liveness endpoint and readiness check aggregation
//! - Graceful shutdown coordination
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::app_info;
//!
//! let router = create_router::<ApiDoc>(api_routes)
//!     .await?
//!     .merge(health_router(app_info!()));
//!
//! create_production_app(router, &config.server, Duration::from_secs(30), cleanup).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{OPENAPI_JSON, create_production_app, create_router};
pub use health::{
    HealthCheckFuture, HealthResponse, ReadinessResult, health_router, run_health_checks,
};
pub use shutdown::ShutdownCoordinator;
