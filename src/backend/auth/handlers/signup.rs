/**
 * Signup Handler
 *
 * POST /api/auth/signup
 *
 * 1. Validate username, email and password
 * 2. Reject duplicates with 409
 * 3. Hash the password with bcrypt
 * 4. Create the user and a session
 * 5. Return the token and account
 */

use axum::{extract::State, http::StatusCode, response::Json};
use bcrypt::hash;

use crate::backend::auth::handlers::login::issue_session;
use crate::backend::auth::handlers::types::{AuthResponse, SignupRequest};
use crate::backend::auth::users::{create_user, get_user_by_email, get_user_by_username};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;
use crate::shared::messaging::user::{validate_email, validate_password, validate_username};

/// Sign up handler
///
/// # Errors
///
/// * `400 Bad Request` - invalid username, email or password
/// * `409 Conflict` - username or email already taken
///
/// # Example Request
///
/// ```http
/// POST /api/auth/signup HTTP/1.1
/// Content-Type: application/json
///
/// {"username": "alice", "email": "alice@example.com", "password": "correct horse"}
/// ```
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> BackendResult<(StatusCode, Json<AuthResponse>)> {
    let username = request.username.trim();
    let email = request.email.trim();
    tracing::info!("Signup request for username: {}", username);

    validate_username(username)?;
    validate_email(email)?;
    validate_password(&request.password)?;

    if get_user_by_username(&state.db, username).await?.is_some() {
        tracing::warn!("Username already exists: {}", username);
        return Err(BackendError::conflict("Username already taken"));
    }
    if get_user_by_email(&state.db, email).await?.is_some() {
        tracing::warn!("Email already exists: {}", email);
        return Err(BackendError::conflict("Email already registered"));
    }

    let password = request.password.clone();
    let cost = state.config.password_cost;
    let password_hash = tokio::task::spawn_blocking(move || hash(password, cost))
        .await
        .map_err(|e| BackendError::state(format!("Password hashing task failed: {}", e)))??;

    let user = match create_user(&state.db, username, email, &password_hash).await {
        Ok(user) => user,
        // Lost a race with a concurrent signup
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(BackendError::conflict("Username or email already registered"));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!("User created: {} ({})", user.username, user.id);
    let response = issue_session(&state, &user).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
