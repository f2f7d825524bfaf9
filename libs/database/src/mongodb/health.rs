use mongodb::{Client, bson::doc};

use crate::common::{DatabaseError, DatabaseResult};

/// Ping the server
///
/// # Example
/// ```ignore
/// use database::mongodb::check_health;
///
/// check_health(&client).await?;
/// ```
pub async fn check_health(client: &Client) -> DatabaseResult<()> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires a running MongoDB (MONGODB_URL)"]
    async fn test_check_health() {
        let url = std::env::var("MONGODB_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let client = Client::with_uri_str(&url).await.unwrap();

        assert!(check_health(&client).await.is_ok());
    }
}
