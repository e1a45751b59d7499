/**
 * Server Initialization
 *
 * Builds the application state from a validated configuration, starts the
 * periodic cleanup task and assembles the router.
 */

use std::time::Duration;

use axum::Router;
use chrono::Utc;
use tokio::task::JoinHandle;

use crate::backend::auth::sessions::delete_expired_sessions;
use crate::backend::error::BackendError;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::load_database;
use crate::backend::server::state::AppState;
use crate::shared::AppConfig;

/// Create and configure the Axum application
///
/// # Initialization Steps
///
/// 1. **Load Database**: open the pool and run migrations
/// 2. **Create State**: signing keys and the room registry
/// 3. **Start Cleanup**: drop idle rooms and expired sessions periodically
/// 4. **Create Router**: configure all routes and middleware
///
/// # Errors
///
/// Fails when the database cannot be opened or migrated.
pub async fn create_app(config: AppConfig) -> Result<Router<()>, BackendError> {
    tracing::info!("Initializing chatline backend server");

    let app_state = build_state(config).await?;
    spawn_cleanup_task(app_state.clone());

    let app = create_router(app_state);
    tracing::info!("Router configured with periodic cleanup task");
    Ok(app)
}

/// Open the database and build the shared state
pub async fn build_state(config: AppConfig) -> Result<AppState, BackendError> {
    let db = load_database(&config).await?;
    Ok(AppState::new(db, config))
}

/// Periodically drop rooms nobody listens to and sessions that expired
pub fn spawn_cleanup_task(app_state: AppState) -> JoinHandle<()> {
    let period = Duration::from_secs(app_state.config.cleanup_interval_secs);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;

            let removed = app_state.rooms.cleanup_inactive_rooms();
            tracing::debug!(
                "Cleaned up {} inactive rooms, {} still open",
                removed,
                app_state.rooms.room_count()
            );

            match delete_expired_sessions(&app_state.db, Utc::now()).await {
                Ok(0) => {}
                Ok(count) => tracing::info!("Removed {} expired sessions", count),
                Err(e) => tracing::error!("Failed to remove expired sessions: {:?}", e),
            }
        }
    })
}
