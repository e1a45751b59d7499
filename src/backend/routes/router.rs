/**
 * Router Configuration
 *
 * Combines all route groups into a single Axum router.
 *
 * # Layers
 *
 * - Protected routes get `auth_middleware` as a route layer, so unknown
 *   paths still fall through to the 404 fallback instead of a 401
 * - Every request is traced (`tower_http::trace`)
 * - CORS allows the configured origins, or any origin when none are set
 */

use axum::{
    extract::State,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method, StatusCode,
    },
    middleware::from_fn_with_state,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::backend::error::BackendError;
use crate::backend::middleware::auth_middleware;
use crate::backend::routes::api_routes::{configure_api_routes, configure_public_routes};
use crate::backend::routes::realtime_routes::configure_realtime_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// 1. **Public**: `/health`, signup, login
/// 2. **Protected**: the rest of `/api` and `/realtime`
/// 3. **Fallback**: JSON 404
pub fn create_router(app_state: AppState) -> Router<()> {
    let protected = configure_realtime_routes(configure_api_routes(Router::new()))
        .route_layer(from_fn_with_state(app_state.clone(), auth_middleware));

    let public = configure_public_routes(Router::new().route("/health", get(health)));

    let cors = cors_layer(&app_state.config.cors_origins);

    public
        .merge(protected)
        .fallback(|| async { BackendError::not_found("Route not found") })
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(app_state)
}

/// Liveness plus a database round trip
async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "status": "ok", "database": "ok" }))),
        Err(e) => {
            tracing::error!("Health check database error: {:?}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "unavailable" })),
            )
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::OPTIONS];

    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers([AUTHORIZATION, CONTENT_TYPE]);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(methods)
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}
