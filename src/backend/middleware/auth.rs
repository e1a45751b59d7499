/**
 * Authentication Middleware
 *
 * Protects routes that require a signed-in user. The token comes from the
 * `Authorization: Bearer <token>` header or, for event streams opened by
 * browsers that cannot set headers, from the `access_token` query
 * parameter. The token must verify and its session must still exist.
 */

use axum::{
    extract::{FromRequestParts, Query, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::backend::auth::sessions::get_active_session;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Authenticated user data attached to the request
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub username: String,
}

#[derive(Debug, Default, Deserialize)]
struct TokenQuery {
    access_token: Option<String>,
}

/// Pull the raw token out of the request
fn extract_token(request: &Request) -> Option<String> {
    if let Some(header) = request.headers().get(AUTHORIZATION).and_then(|h| h.to_str().ok()) {
        return header.strip_prefix("Bearer ").map(|t| t.trim().to_string());
    }
    Query::<TokenQuery>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(query)| query.access_token)
}

/// Authentication middleware
///
/// 1. Extracts the token (header or `access_token` query)
/// 2. Verifies signature and expiry
/// 3. Checks the session still exists and belongs to the token's user
/// 4. Attaches `AuthenticatedUser` to the request extensions
///
/// Returns 401 Unauthorized on any failure.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = extract_token(&request).ok_or_else(|| {
        tracing::warn!("Missing bearer token for {}", request.uri().path());
        BackendError::unauthorized("Authentication required")
    })?;

    let claims = app_state.keys.verify_token(&token).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        BackendError::unauthorized("Invalid or expired token")
    })?;

    let (user_id, session_id) = match (claims.user_id(), claims.session_id()) {
        (Some(user_id), Some(session_id)) => (user_id, session_id),
        _ => {
            tracing::warn!("Malformed token claims");
            return Err(BackendError::unauthorized("Invalid or expired token"));
        }
    };

    let session = get_active_session(&app_state.db, session_id, Utc::now()).await?;
    if session.map(|s| s.user_id) != Some(user_id) {
        tracing::warn!("Session {} is gone or not owned by {}", session_id, user_id);
        return Err(BackendError::unauthorized("Session expired"));
    }

    let user = get_user_by_id(&app_state.db, user_id)
        .await?
        .ok_or_else(|| BackendError::unauthorized("Session expired"))?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id,
        session_id,
        username: user.username,
    });

    Ok(next.run(request).await)
}

/// Axum extractor for the user set by `auth_middleware`
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts.extensions.get::<AuthenticatedUser>().cloned().ok_or_else(|| {
            tracing::warn!("AuthenticatedUser not found in request extensions");
            BackendError::unauthorized("Authentication required")
        })?;

        Ok(AuthUser(user))
    }
}
