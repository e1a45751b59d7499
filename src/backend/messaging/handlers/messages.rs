//! Message handlers
//!
//! Every new message (sent or forwarded) goes through `deliver`: it is
//! emitted to all participants of its chat and the other participants get
//! a notification if their preferences allow it.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use super::{ensure_participant, load_user};
use crate::backend::auth::users::{get_user_by_id, User};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::messaging::db;
use crate::backend::middleware::AuthUser;
use crate::backend::notify::{notify, Notification};
use crate::backend::server::state::AppState;
use crate::shared::messaging::message::{clamp_page_size, summarize_reactions, validate_content, validate_emoji};
use crate::shared::messaging::{
    ChatMessage, ForwardRequest, ForwardResponse, ListMessagesQuery, ListMessagesResponse, MarkReadResponse,
    ReactRequest, ReactResponse, SendMessageRequest,
};
use crate::shared::RealtimeEvent;

/// Emit a stored message to its chat and notify the other participants
async fn deliver(state: &AppState, sender: &User, message: &ChatMessage) -> BackendResult<()> {
    let participants = db::participant_ids(&state.db, message.chat_id).await?;
    let delivered = state.rooms.emit_many(&participants, &RealtimeEvent::new_message(message)?);
    tracing::debug!("Message {} delivered to {} receivers", message.id, delivered);

    for participant in participants.into_iter().filter(|id| *id != sender.id) {
        match get_user_by_id(&state.db, participant).await? {
            Some(recipient) => {
                notify(&state.rooms, &recipient, Notification::new_message(sender, message));
            }
            None => tracing::warn!("Participant {} of chat {} no longer exists", participant, message.chat_id),
        }
    }
    Ok(())
}

async fn load_message(state: &AppState, message_id: Uuid) -> BackendResult<ChatMessage> {
    db::get_message(&state.db, message_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Message not found"))
}

/// Page through a chat, newest first (GET /api/chats/{chat_id}/messages)
pub async fn list_messages(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(chat_id): Path<Uuid>,
    Query(query): Query<ListMessagesQuery>,
) -> BackendResult<Json<ListMessagesResponse>> {
    ensure_participant(&state, chat_id, user.user_id).await?;

    let before = match query.before {
        Some(message_id) => Some(
            db::message_position(&state.db, chat_id, message_id)
                .await?
                .ok_or_else(|| BackendError::not_found("Cursor message not found in this chat"))?,
        ),
        None => None,
    };

    let (messages, has_more) = db::list_messages(&state.db, chat_id, clamp_page_size(query.limit), before).await?;
    Ok(Json(ListMessagesResponse { messages, has_more }))
}

/// Post a message (POST /api/chats/{chat_id}/messages)
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(chat_id): Path<Uuid>,
    Json(request): Json<SendMessageRequest>,
) -> BackendResult<(StatusCode, Json<ChatMessage>)> {
    ensure_participant(&state, chat_id, user.user_id).await?;
    let content = validate_content(&request.content)?;

    if let Some(reply_to) = request.reply_to {
        if !db::message_in_chat(&state.db, chat_id, reply_to).await? {
            return Err(BackendError::bad_request("Replied-to message is not in this chat"));
        }
    }

    let sender = load_user(&state, user.user_id).await?;
    let mut message = ChatMessage::new_text(chat_id, sender.id, content);
    message.reply_to = request.reply_to;

    db::record_message(&state.db, &message).await?;
    tracing::info!("{} sent message {} in chat {}", sender.username, message.id, chat_id);

    deliver(&state, &sender, &message).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// Mark the chat as read (POST /api/chats/{chat_id}/read)
///
/// Only messages not read before are reported, so repeating the call emits
/// nothing.
pub async fn mark_read(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(chat_id): Path<Uuid>,
) -> BackendResult<Json<MarkReadResponse>> {
    ensure_participant(&state, chat_id, user.user_id).await?;

    let read_at = Utc::now();
    let message_ids = db::mark_chat_read(&state.db, chat_id, user.user_id, read_at).await?;

    if !message_ids.is_empty() {
        tracing::debug!("{} read {} messages in chat {}", user.username, message_ids.len(), chat_id);
        let others: Vec<Uuid> = db::participant_ids(&state.db, chat_id)
            .await?
            .into_iter()
            .filter(|id| *id != user.user_id)
            .collect();
        state.rooms.emit_many(
            &others,
            &RealtimeEvent::messages_read(chat_id, user.user_id, &message_ids, read_at),
        );
    }

    Ok(Json(MarkReadResponse {
        chat_id,
        message_ids,
        read_at,
    }))
}

/// Add, replace or toggle off a reaction (POST /api/messages/{message_id}/reactions)
pub async fn react_to_message(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(message_id): Path<Uuid>,
    Json(request): Json<ReactRequest>,
) -> BackendResult<Json<ReactResponse>> {
    let emoji = validate_emoji(&request.emoji)?;
    let message = load_message(&state, message_id).await?;
    ensure_participant(&state, message.chat_id, user.user_id).await?;

    if message.deleted {
        return Err(BackendError::conflict("Cannot react to a deleted message"));
    }

    let (change, reactions) = db::apply_reaction(&state.db, message_id, user.user_id, &emoji).await?;
    tracing::info!("{} reaction {:?} on message {}", user.username, change, message_id);

    let participants = db::participant_ids(&state.db, message.chat_id).await?;
    state.rooms.emit_many(
        &participants,
        &RealtimeEvent::message_reaction(message.chat_id, message_id, &reactions)?,
    );

    Ok(Json(ReactResponse {
        message_id,
        change,
        summary: summarize_reactions(&reactions),
        reactions,
    }))
}

/// Copy a message into other chats (POST /api/messages/{message_id}/forward)
///
/// Every target is checked before anything is written.
pub async fn forward_message(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(message_id): Path<Uuid>,
    Json(request): Json<ForwardRequest>,
) -> BackendResult<(StatusCode, Json<ForwardResponse>)> {
    let targets = request.targets()?;
    let original = load_message(&state, message_id).await?;
    ensure_participant(&state, original.chat_id, user.user_id).await?;

    if original.deleted {
        return Err(BackendError::conflict("Cannot forward a deleted message"));
    }
    for chat_id in &targets {
        ensure_participant(&state, *chat_id, user.user_id).await?;
    }

    let sender = load_user(&state, user.user_id).await?;
    let messages: Vec<ChatMessage> = targets
        .iter()
        .map(|chat_id| ChatMessage::forwarded(&original, *chat_id, sender.id))
        .collect();

    db::record_messages(&state.db, &messages).await?;
    tracing::info!("{} forwarded message {} to {} chats", sender.username, message_id, messages.len());

    for message in &messages {
        deliver(&state, &sender, message).await?;
    }

    Ok((StatusCode::CREATED, Json(ForwardResponse { messages })))
}

/// Soft-delete one of the caller's messages (DELETE /api/messages/{message_id})
pub async fn delete_message(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(message_id): Path<Uuid>,
) -> BackendResult<StatusCode> {
    let message = load_message(&state, message_id).await?;
    if message.sender_id != user.user_id {
        return Err(BackendError::forbidden("Only the sender can delete this message"));
    }

    if !db::soft_delete_message(&state.db, message_id).await? {
        return Err(BackendError::conflict("Message already deleted"));
    }
    tracing::info!("{} deleted message {}", user.username, message_id);

    let participants = db::participant_ids(&state.db, message.chat_id).await?;
    state.rooms.emit_many(
        &participants,
        &RealtimeEvent::message_deleted(message.chat_id, message_id),
    );
    Ok(StatusCode::NO_CONTENT)
}
