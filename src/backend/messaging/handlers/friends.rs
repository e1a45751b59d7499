//! Friend request handlers
//!
//! A request moves from `pending` to exactly one of `accepted`, `rejected`
//! or `cancelled`. Accepting makes the two users friends and opens (or
//! reuses) their direct chat.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use super::{chat_view, load_user};
use crate::backend::auth::users::get_user_by_identifier;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::messaging::db;
use crate::backend::middleware::AuthUser;
use crate::backend::notify::{notify, Notification};
use crate::backend::server::state::AppState;
use crate::shared::messaging::{
    AcceptFriendRequestResponse, FriendRequest, FriendRequestStatus, ListFriendRequestsResponse,
    ListFriendsResponse, SendFriendRequestRequest,
};
use crate::shared::{EventType, RealtimeEvent};

/// Send a friend request (POST /api/friends/requests)
///
/// `to` is a username or an email address.
pub async fn send_friend_request(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<SendFriendRequestRequest>,
) -> BackendResult<(StatusCode, Json<FriendRequest>)> {
    let target = request.to.trim();
    if target.is_empty() {
        return Err(BackendError::bad_request("Recipient is required"));
    }

    let sender = load_user(&state, user.user_id).await?;
    let recipient = get_user_by_identifier(&state.db, target)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    if recipient.id == sender.id {
        return Err(BackendError::bad_request("You cannot send a friend request to yourself"));
    }
    if db::are_friends(&state.db, sender.id, recipient.id).await? {
        return Err(BackendError::conflict("Already friends"));
    }
    if db::pending_request_between(&state.db, sender.id, recipient.id).await?.is_some() {
        return Err(BackendError::conflict("Friend request already pending"));
    }

    let friend_request = match db::create_friend_request(&state.db, &sender, &recipient).await {
        Ok(friend_request) => friend_request,
        // The other side sent one at the same moment
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(BackendError::conflict("Friend request already pending"));
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!("Friend request {} from {} to {}", friend_request.id, sender.username, recipient.username);

    state.rooms.emit(
        recipient.id,
        RealtimeEvent::friend_request(EventType::FriendRequestReceived, &friend_request)?,
    );
    notify(&state.rooms, &recipient, Notification::friend_request(&friend_request));

    Ok((StatusCode::CREATED, Json(friend_request)))
}

/// Pending requests to and from the caller (GET /api/friends/requests)
pub async fn list_friend_requests(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> BackendResult<Json<ListFriendRequestsResponse>> {
    let incoming = db::list_incoming_requests(&state.db, user.user_id).await?;
    let outgoing = db::list_outgoing_requests(&state.db, user.user_id).await?;
    Ok(Json(ListFriendRequestsResponse { incoming, outgoing }))
}

async fn load_request(state: &AppState, request_id: Uuid) -> BackendResult<FriendRequest> {
    db::get_friend_request(&state.db, request_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Friend request not found"))
}

/// Accept a friend request (POST /api/friends/requests/{id}/accept)
pub async fn accept_friend_request(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(request_id): Path<Uuid>,
) -> BackendResult<Json<AcceptFriendRequestResponse>> {
    let mut friend_request = load_request(&state, request_id).await?;
    if friend_request.to_user_id != user.user_id {
        return Err(BackendError::forbidden("Only the recipient can accept this request"));
    }

    friend_request.transition(FriendRequestStatus::Accepted, Utc::now())?;
    let (chat_id, created) = db::accept_friend_request(&state.db, &friend_request)
        .await?
        .ok_or_else(|| BackendError::conflict("Friend request is no longer pending"))?;

    tracing::info!(
        "Friend request {} accepted, direct chat {} ({})",
        friend_request.id,
        chat_id,
        if created { "created" } else { "reused" }
    );

    let sender_id = friend_request.from_user_id;
    let sender_chat = chat_view(&state, chat_id, sender_id).await?;
    state.rooms.emit(
        sender_id,
        RealtimeEvent::friend_request_accepted(&friend_request, &sender_chat)?,
    );
    state.rooms.emit(sender_id, RealtimeEvent::chat_created(&sender_chat)?);

    let recipient_chat = chat_view(&state, chat_id, user.user_id).await?;
    state.rooms.emit(user.user_id, RealtimeEvent::chat_created(&recipient_chat)?);

    let sender = load_user(&state, sender_id).await?;
    notify(
        &state.rooms,
        &sender,
        Notification::friend_request_accepted(&friend_request, chat_id),
    );

    Ok(Json(AcceptFriendRequestResponse {
        request: friend_request,
        chat: recipient_chat,
    }))
}

/// Reject a friend request (POST /api/friends/requests/{id}/reject)
pub async fn reject_friend_request(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(request_id): Path<Uuid>,
) -> BackendResult<Json<FriendRequest>> {
    let mut friend_request = load_request(&state, request_id).await?;
    if friend_request.to_user_id != user.user_id {
        return Err(BackendError::forbidden("Only the recipient can reject this request"));
    }

    close_request(&state, &mut friend_request, user.user_id, FriendRequestStatus::Rejected).await?;
    Ok(Json(friend_request))
}

/// Withdraw a friend request (DELETE /api/friends/requests/{id})
pub async fn cancel_friend_request(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(request_id): Path<Uuid>,
) -> BackendResult<Json<FriendRequest>> {
    let mut friend_request = load_request(&state, request_id).await?;
    if friend_request.from_user_id != user.user_id {
        return Err(BackendError::forbidden("Only the sender can cancel this request"));
    }

    close_request(&state, &mut friend_request, user.user_id, FriendRequestStatus::Cancelled).await?;
    Ok(Json(friend_request))
}

/// Reject or cancel, then tell the other side
async fn close_request(
    state: &AppState,
    friend_request: &mut FriendRequest,
    closed_by: Uuid,
    status: FriendRequestStatus,
) -> BackendResult<()> {
    friend_request.transition(status, Utc::now())?;
    if !db::update_request_status(&state.db, friend_request).await? {
        return Err(BackendError::conflict("Friend request is no longer pending"));
    }
    tracing::info!("Friend request {} {}", friend_request.id, status.as_str());

    let event_type = match status {
        FriendRequestStatus::Rejected => EventType::FriendRequestRejected,
        _ => EventType::FriendRequestCancelled,
    };
    state.rooms.emit(
        friend_request.counterpart(closed_by),
        RealtimeEvent::friend_request(event_type, friend_request)?,
    );
    Ok(())
}

/// The caller's friends with live presence (GET /api/friends)
pub async fn list_friends(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> BackendResult<Json<ListFriendsResponse>> {
    let mut friends: Vec<_> = db::list_friends(&state.db, user.user_id)
        .await?
        .iter()
        .map(|friend| friend.to_profile(false))
        .collect();
    state.rooms.fill_presence(&mut friends);
    Ok(Json(ListFriendsResponse { friends }))
}

/// Unfriend (DELETE /api/friends/{user_id})
///
/// The direct chat and its history stay.
pub async fn remove_friend(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(friend_id): Path<Uuid>,
) -> BackendResult<StatusCode> {
    if !db::remove_friendship(&state.db, user.user_id, friend_id).await? {
        return Err(BackendError::not_found("Not friends with this user"));
    }

    tracing::info!("{} removed friend {}", user.username, friend_id);
    state.rooms.emit(friend_id, RealtimeEvent::friend_removed(user.user_id));
    Ok(StatusCode::NO_CONTENT)
}
