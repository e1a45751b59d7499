//! Notification Gating
//!
//! Decides whether a user gets a notification and delivers it as a
//! `notification` event into their room.
//!
//! - **Fun** mode: notifications are always on
//! - **Control** mode: the user's `notifications_enabled` toggle decides
//!
//! Suppressed notifications are only logged.

use serde_json::{json, Value};
use uuid::Uuid;

use crate::backend::auth::users::User;
use crate::backend::realtime::RoomRegistry;
use crate::shared::messaging::{ChatMessage, FriendRequest, NotificationMode};
use crate::shared::RealtimeEvent;

/// Characters of a message shown in a notification body
const BODY_PREVIEW_LEN: usize = 100;

/// Whether a user in `mode` with the toggle at `enabled` gets notified
pub fn should_notify(mode: NotificationMode, enabled: bool) -> bool {
    mode.allows(enabled)
}

/// A notification about to be delivered
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub data: Value,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>, data: Value) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            data,
        }
    }

    pub fn new_message(sender: &User, message: &ChatMessage) -> Self {
        let title = if message.forwarded_from.is_some() {
            format!("{} forwarded a message", sender.display_name_or_username())
        } else {
            sender.display_name_or_username().to_string()
        };
        Self::new(
            title,
            message.preview(BODY_PREVIEW_LEN),
            json!({
                "kind": "new_message",
                "chat_id": message.chat_id,
                "message_id": message.id,
            }),
        )
    }

    pub fn friend_request(request: &FriendRequest) -> Self {
        Self::new(
            "New friend request",
            format!("{} wants to be your friend", request.from_username),
            json!({
                "kind": "friend_request",
                "request_id": request.id,
                "from_user_id": request.from_user_id,
            }),
        )
    }

    pub fn friend_request_accepted(request: &FriendRequest, chat_id: Uuid) -> Self {
        Self::new(
            "Friend request accepted",
            format!("{} accepted your friend request", request.to_username),
            json!({
                "kind": "friend_request_accepted",
                "request_id": request.id,
                "chat_id": chat_id,
            }),
        )
    }
}

/// Deliver `notification` to `recipient` if their preferences allow it
///
/// Returns whether it was sent.
pub fn notify(rooms: &RoomRegistry, recipient: &User, notification: Notification) -> bool {
    if !should_notify(recipient.mode(), recipient.notifications_enabled) {
        tracing::debug!(
            "[Notify] Suppressed '{}' for {} ({} mode, notifications off)",
            notification.title,
            recipient.username,
            recipient.mode().as_str()
        );
        return false;
    }

    tracing::info!("[Notify] '{}' -> {}", notification.title, recipient.username);
    rooms.emit(
        recipient.id,
        RealtimeEvent::notification(&notification.title, &notification.body, notification.data),
    );
    true
}
