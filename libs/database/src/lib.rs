//! Connection management for the document store
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB connector, config and health checks
//! - `config` - `core_config::FromEnv` for [`mongodb::MongoConfig`] and
//!   [`common::RetryConfig`]
//!
//! # Example
//!
//! ```ignore
//! use database::common::RetryConfig;
//! use database::mongodb::{self, MongoConfig};
//!
//! let config = MongoConfig::with_database("mongodb://localhost:27017", "UserCRUD");
//! let client = mongodb::connect_from_config_with_retry(&config, Some(RetryConfig::new())).await?;
//! let db = client.database(config.database());
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult};
