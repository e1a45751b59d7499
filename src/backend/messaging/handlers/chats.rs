//! Chat handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::{chat_view, ensure_participant};
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::messaging::db;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::messaging::{Chat, CreateChatRequest, ListChatsResponse};
use crate::shared::RealtimeEvent;

/// The caller's chats, most recent activity first (GET /api/chats)
pub async fn list_chats(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> BackendResult<Json<ListChatsResponse>> {
    let mut chats = Vec::new();
    for chat_id in db::list_chat_ids_for_user(&state.db, user.user_id).await? {
        chats.push(chat_view(&state, chat_id, user.user_id).await?);
    }
    chats.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    let total_unread = chats.iter().map(|c| c.unread_count).sum();
    Ok(Json(ListChatsResponse { chats, total_unread }))
}

/// Open a chat with friends (POST /api/chats)
///
/// With a single other participant the existing direct chat is returned
/// (200) instead of creating a second one (201).
pub async fn create_chat(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateChatRequest>,
) -> BackendResult<(StatusCode, Json<Chat>)> {
    let others = request.others(user.user_id)?;

    for other in &others {
        if get_user_by_id(&state.db, *other).await?.is_none() {
            return Err(BackendError::not_found(format!("User {} not found", other)));
        }
        if !db::are_friends(&state.db, user.user_id, *other).await? {
            tracing::warn!("{} tried to open a chat with non-friend {}", user.username, other);
            return Err(BackendError::forbidden("You can only chat with friends"));
        }
    }

    let (chat_id, created) = if let [other] = others.as_slice() {
        let mut conn = state.db.acquire().await?;
        db::find_or_create_direct_chat(&mut conn, user.user_id, *other).await?
    } else {
        let mut participants = vec![user.user_id];
        participants.extend(others.iter().copied());
        (db::create_chat(&state.db, &participants).await?, true)
    };

    let chat = chat_view(&state, chat_id, user.user_id).await?;
    if !created {
        return Ok((StatusCode::OK, Json(chat)));
    }

    tracing::info!("{} created chat {} with {} participants", user.username, chat_id, chat.participants.len());
    for participant in chat.participant_ids() {
        let view = if participant == user.user_id {
            chat.clone()
        } else {
            chat_view(&state, chat_id, participant).await?
        };
        state.rooms.emit(participant, RealtimeEvent::chat_created(&view)?);
    }

    Ok((StatusCode::CREATED, Json(chat)))
}

/// A single chat (GET /api/chats/{chat_id})
pub async fn get_chat(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(chat_id): Path<Uuid>,
) -> BackendResult<Json<Chat>> {
    ensure_participant(&state, chat_id, user.user_id).await?;
    Ok(Json(chat_view(&state, chat_id, user.user_id).await?))
}
