/**
 * Application State Management
 *
 * `AppState` is cloned into every handler. It holds the database pool, the
 * per-user room registry, the token signing keys and the configuration.
 * The `FromRef` implementations let handlers extract only the part they
 * need, e.g. `State(pool): State<SqlitePool>`.
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::backend::auth::sessions::{SharedTokenKeys, TokenKeys};
use crate::backend::realtime::RoomRegistry;
use crate::shared::AppConfig;

/// Central state container for the Axum application
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub db: SqlitePool,
    /// Per-user broadcast rooms for live events
    pub rooms: RoomRegistry,
    /// Token signing keys and session lifetime
    pub keys: SharedTokenKeys,
    /// Validated configuration the server was started with
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: AppConfig) -> Self {
        Self {
            db,
            rooms: RoomRegistry::new(config.room_capacity),
            keys: Arc::new(TokenKeys::new(&config.jwt_secret, config.session_ttl_hours)),
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db.clone()
    }
}

impl FromRef<AppState> for RoomRegistry {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.rooms.clone()
    }
}

impl FromRef<AppState> for SharedTokenKeys {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.keys.clone()
    }
}
