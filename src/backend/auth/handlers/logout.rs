/**
 * Logout Handler
 *
 * POST /api/auth/logout
 *
 * Deletes the session behind the presented token. Live event streams that
 * are already open stay open until the client disconnects.
 */

use axum::{extract::State, http::StatusCode};

use crate::backend::auth::sessions::delete_session;
use crate::backend::error::BackendResult;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;

pub async fn logout(State(state): State<AppState>, AuthUser(user): AuthUser) -> BackendResult<StatusCode> {
    delete_session(&state.db, user.session_id).await?;
    tracing::info!("User logged out: {} (session {})", user.username, user.session_id);
    Ok(StatusCode::NO_CONTENT)
}
