/**
 * Database Loading
 *
 * Opens the SQLite pool named by the configuration and runs the embedded
 * migrations from `migrations/`. File databases are created on first
 * start. In-memory databases live on a single connection that is never
 * recycled, since closing it would drop the data.
 */

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::shared::AppConfig;

const MAX_CONNECTIONS: u32 = 5;

/// Connect to the configured database and bring the schema up to date
pub async fn load_database(config: &AppConfig) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("Connecting to database {}", config.database_url);

    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = if config.is_memory_database() {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?
    };

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database migrations completed successfully");

    Ok(pool)
}

/// Fresh in-memory database with the schema applied
pub async fn connect_memory_database() -> Result<SqlitePool, sqlx::Error> {
    let config = AppConfig::builder()
        .database_url("sqlite::memory:")
        .build()
        .map_err(|e| sqlx::Error::Configuration(Box::new(e)))?;
    load_database(&config).await
}
