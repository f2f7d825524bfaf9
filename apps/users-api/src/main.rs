use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::mongodb::connect_from_config_with_retry;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    let mongo_client =
        connect_from_config_with_retry(&config.mongodb, Some(config.retry.clone())).await?;
    let db = mongo_client.database(config.mongodb.database());

    api::users::init_indexes(&db).await?;

    let state = AppState {
        config,
        mongo_client,
        db,
    };

    // Nested under /api by create_router
    let api_routes = api::routes(&state);

    let router = create_router::<openapi::ApiDoc>(api_routes).await?;
    let app = router.merge(health_router(state.config.app));

    info!("Starting users API with graceful shutdown ({:?} timeout)", SHUTDOWN_TIMEOUT);

    let client = state.mongo_client.clone();
    create_production_app(app, &state.config.server, SHUTDOWN_TIMEOUT, async move {
        info!("Shutting down: closing MongoDB connections");
        client.shutdown().await;
        info!("MongoDB connection closed successfully");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Users API shutdown complete");
    Ok(())
}
