//! Messaging HTTP Handlers
//!
//! - **`friends`** - Friend requests and the friend list
//! - **`chats`** - Listing, creating and opening chats
//! - **`messages`** - Sending, paging, reacting, forwarding, deleting, read receipts
//! - **`typing`** - Typing indicators

pub mod friends;
pub mod chats;
pub mod messages;
pub mod typing;

use uuid::Uuid;

use crate::backend::auth::users::{get_user_by_id, User};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::messaging::db;
use crate::backend::server::state::AppState;
use crate::shared::messaging::Chat;

pub use chats::{create_chat, get_chat, list_chats};
pub use friends::{
    accept_friend_request, cancel_friend_request, list_friend_requests, list_friends, reject_friend_request,
    remove_friend, send_friend_request,
};
pub use messages::{delete_message, forward_message, list_messages, mark_read, react_to_message, send_message};
pub use typing::send_typing;

/// 404 for unknown chats, 403 for chats the user is not part of
pub(crate) async fn ensure_participant(state: &AppState, chat_id: Uuid, user_id: Uuid) -> BackendResult<()> {
    if db::is_participant(&state.db, chat_id, user_id).await? {
        return Ok(());
    }
    if db::chat_exists(&state.db, chat_id).await? {
        tracing::warn!("User {} is not a participant of chat {}", user_id, chat_id);
        Err(BackendError::forbidden("You are not a participant of this chat"))
    } else {
        Err(BackendError::not_found("Chat not found"))
    }
}

/// A chat as seen by `viewer`, with live presence filled in
pub(crate) async fn chat_view(state: &AppState, chat_id: Uuid, viewer: Uuid) -> BackendResult<Chat> {
    let mut chat = db::load_chat(&state.db, chat_id, viewer)
        .await?
        .ok_or_else(|| BackendError::not_found("Chat not found"))?;
    state.rooms.fill_presence(&mut chat.participants);
    Ok(chat)
}

pub(crate) async fn load_user(state: &AppState, user_id: Uuid) -> BackendResult<User> {
    get_user_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))
}
