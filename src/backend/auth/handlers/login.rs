/**
 * Login Handler
 *
 * POST /api/auth/login
 *
 * Looks the user up by username or email, checks the password and opens a
 * new session. Unknown users and wrong passwords get the same 401.
 */

use axum::{extract::State, response::Json};
use bcrypt::verify;

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest};
use crate::backend::auth::sessions::create_session;
use crate::backend::auth::users::{get_user_by_identifier, User};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid username/email or password";

/// Login handler
///
/// # Example Request
///
/// ```http
/// POST /api/auth/login HTTP/1.1
/// Content-Type: application/json
///
/// {"identifier": "alice@example.com", "password": "correct horse"}
/// ```
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> BackendResult<Json<AuthResponse>> {
    let identifier = request.identifier.trim();
    tracing::info!("Login request for: {}", identifier);

    let user = match get_user_by_identifier(&state.db, identifier).await? {
        Some(user) => user,
        None => {
            tracing::warn!("Login for unknown user: {}", identifier);
            return Err(BackendError::unauthorized(INVALID_CREDENTIALS));
        }
    };

    let password = request.password.clone();
    let password_hash = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || verify(password, &password_hash))
        .await
        .map_err(|e| BackendError::state(format!("Password check task failed: {}", e)))??;

    if !valid {
        tracing::warn!("Invalid password for user: {}", user.username);
        return Err(BackendError::unauthorized(INVALID_CREDENTIALS));
    }

    tracing::info!("User logged in: {}", user.username);
    Ok(Json(issue_session(&state, &user).await?))
}

/// Open a session for `user` and sign a token for it
pub(crate) async fn issue_session(state: &AppState, user: &User) -> BackendResult<AuthResponse> {
    let session = create_session(&state.db, user.id, state.keys.session_ttl()).await?;
    let token = state.keys.create_token(&session)?;
    Ok(AuthResponse {
        token,
        user: user.to_account(),
    })
}
