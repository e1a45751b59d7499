/**
 * Get Current User Handler
 *
 * GET /api/auth/me - the signed-in user's private account view, including
 * notification preferences.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::messaging::AccountResponse;

pub async fn get_me(State(state): State<AppState>, AuthUser(user): AuthUser) -> BackendResult<Json<AccountResponse>> {
    let account = get_user_by_id(&state.db, user.user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;
    Ok(Json(account.to_account()))
}
