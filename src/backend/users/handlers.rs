/**
 * User and Profile Handlers
 *
 * - `GET /api/users/search?q=` - find users by username or display name
 * - `GET /api/users/{user_id}` - public profile with live presence
 * - `PATCH /api/profile` - edit display name, bio, avatar
 * - `PUT /api/profile/mode` - switch between Fun and Control mode
 * - `PUT /api/profile/notifications` - toggle notifications (Control mode only)
 */

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::backend::auth::users::{self, get_user_by_id};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::messaging::db::list_friend_ids;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::messaging::{
    AccountResponse, ListUsersResponse, SearchUsersQuery, SetNotificationModeRequest, SetNotificationsRequest,
    UpdateProfileRequest, UserProfile,
};
use crate::shared::RealtimeEvent;

/// Maximum number of search results
const SEARCH_LIMIT: i64 = 20;

pub async fn search_users(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<SearchUsersQuery>,
) -> BackendResult<Json<ListUsersResponse>> {
    let q = query.q.trim();
    if q.is_empty() {
        return Err(BackendError::bad_request("Search query cannot be empty"));
    }

    let mut found: Vec<UserProfile> = users::search_users(&state.db, q, user.user_id, SEARCH_LIMIT)
        .await?
        .iter()
        .map(|u| u.to_profile(false))
        .collect();
    state.rooms.fill_presence(&mut found);

    tracing::debug!("Search '{}' by {} returned {} users", q, user.username, found.len());
    Ok(Json(ListUsersResponse { users: found }))
}

pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(user_id): Path<Uuid>,
) -> BackendResult<Json<UserProfile>> {
    let user = get_user_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;
    Ok(Json(user.to_profile(state.rooms.is_online(user_id))))
}

/// Edit the caller's profile and tell their friends
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> BackendResult<Json<AccountResponse>> {
    request.validate()?;

    let current = get_user_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;
    let updated = users::update_profile(&state.db, &current, &request).await?;
    tracing::info!("Profile updated: {}", updated.username);

    let profile = updated.to_profile(state.rooms.is_online(updated.id));
    let friends = list_friend_ids(&state.db, updated.id).await?;
    state.rooms.emit_many(&friends, &RealtimeEvent::profile_updated(&profile)?);

    Ok(Json(updated.to_account()))
}

/// Switch notification mode. Fun mode turns notifications on.
pub async fn set_notification_mode(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    Json(request): Json<SetNotificationModeRequest>,
) -> BackendResult<Json<AccountResponse>> {
    let updated = users::set_notification_mode(&state.db, auth.user_id, request.mode).await?;
    tracing::info!("{} switched to {} mode", updated.username, request.mode.as_str());
    Ok(Json(updated.to_account()))
}

/// Toggle notifications. Rejected with 409 in Fun mode.
pub async fn set_notifications(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    Json(request): Json<SetNotificationsRequest>,
) -> BackendResult<Json<AccountResponse>> {
    let current = get_user_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    if !current.mode().is_toggleable() {
        tracing::warn!("{} tried to toggle notifications in Fun mode", current.username);
        return Err(BackendError::conflict("Notifications are always on in Fun mode"));
    }

    let updated = users::set_notifications_enabled(&state.db, current.id, request.enabled).await?;
    tracing::info!("{} turned notifications {}", updated.username, if request.enabled { "on" } else { "off" });
    Ok(Json(updated.to_account()))
}
