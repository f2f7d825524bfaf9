//! Users API routes

use axum::Router;
use domain_users::{MongoUserRepository, UserService, handlers};
use tracing::info;

use crate::state::AppState;

/// Create the users router over the MongoDB repository
pub fn router(state: &AppState) -> Router {
    let repository = MongoUserRepository::new(&state.db);
    let service = UserService::new(repository);

    handlers::router(service)
}

/// Create the users collection indexes; the unique email index is required
/// before serving traffic
pub async fn init_indexes(db: &mongodb::Database) -> eyre::Result<()> {
    MongoUserRepository::new(db)
        .create_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create user indexes: {}", e))?;
    info!("User collection indexes created");
    Ok(())
}
