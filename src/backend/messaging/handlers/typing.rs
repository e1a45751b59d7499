//! Typing indicator handler

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use bytes::Bytes;
use uuid::Uuid;

use super::ensure_participant;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::messaging::db;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::messaging::TypingRequest;
use crate::shared::RealtimeEvent;

/// Tell the other participants the caller is (not) typing
/// (POST /api/chats/{chat_id}/typing)
///
/// An empty body means `{"is_typing": true}`. Nothing is stored.
pub async fn send_typing(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(chat_id): Path<Uuid>,
    body: Bytes,
) -> BackendResult<StatusCode> {
    let is_typing = if body.is_empty() {
        true
    } else {
        serde_json::from_slice::<TypingRequest>(&body)
            .map_err(|e| BackendError::bad_request(format!("Invalid typing body: {}", e)))?
            .is_typing
    };

    ensure_participant(&state, chat_id, user.user_id).await?;

    let others: Vec<Uuid> = db::participant_ids(&state.db, chat_id)
        .await?
        .into_iter()
        .filter(|id| *id != user.user_id)
        .collect();

    let delivered = state.rooms.emit_many(
        &others,
        &RealtimeEvent::typing(chat_id, user.user_id, &user.username, is_typing),
    );
    tracing::debug!("{} typing={} in {} ({} receivers)", user.username, is_typing, chat_id, delivered);

    Ok(StatusCode::NO_CONTENT)
}
