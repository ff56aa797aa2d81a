//! Database connectivity check.

use tracing::info;

use nextshop_api::config::DatabaseConfig;
use nextshop_api::db;

use super::CommandError;

/// Connect to the configured database and run `{ ping: 1 }`.
///
/// # Errors
///
/// Returns an error if configuration is missing or the server does not answer.
pub async fn run() -> Result<(), CommandError> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = DatabaseConfig::from_env()?;
    info!(database = %config.name, "Connecting to MongoDB");

    db::connect(&config).await?;
    info!("Pinged MongoDB successfully!");

    Ok(())
}
