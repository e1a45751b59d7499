/**
 * Real-time Routes
 *
 * `GET /realtime` streams the caller's events as SSE. The token may come
 * from the `access_token` query parameter since browser event sources
 * cannot set headers.
 */

use axum::{routing::get, Router};

use crate::backend::realtime::handle_realtime_subscription;
use crate::backend::server::state::AppState;

pub fn configure_realtime_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/realtime", get(handle_realtime_subscription))
}
