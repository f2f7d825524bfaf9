//! Shared application state passed to route builders.

use mongodb::{Client, Database};

/// Cloning is cheap: the client and database share one connection pool.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub mongo_client: Client,
    pub db: Database,
}
