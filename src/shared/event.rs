/**
 * Real-time Event System
 *
 * This module defines the envelope pushed into user rooms. Each event has a
 * type (used as the SSE event name), a JSON payload and the time it was
 * produced.
 */
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;
use crate::shared::messaging::{Chat, ChatMessage, FriendRequest, Reaction, UserProfile};

/// Type of real-time event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A message was posted (or forwarded) into a chat
    NewMessage,
    /// The reaction list of a message changed
    MessageReaction,
    /// A message was soft-deleted
    MessageDeleted,
    /// A participant read the chat
    MessagesRead,
    /// A participant started or stopped typing
    Typing,
    /// Someone sent the user a friend request
    FriendRequestReceived,
    /// A friend request the user sent was accepted
    FriendRequestAccepted,
    /// A friend request the user sent was rejected
    FriendRequestRejected,
    /// A friend request addressed to the user was withdrawn
    FriendRequestCancelled,
    /// A friendship was removed
    FriendRemoved,
    /// A chat the user participates in was created
    ChatCreated,
    /// A friend came online or went offline
    Presence,
    /// A friend changed their profile
    ProfileUpdated,
    /// User-facing notification
    Notification,
}

impl EventType {
    /// All event types, in declaration order
    pub const ALL: [EventType; 14] = [
        EventType::NewMessage,
        EventType::MessageReaction,
        EventType::MessageDeleted,
        EventType::MessagesRead,
        EventType::Typing,
        EventType::FriendRequestReceived,
        EventType::FriendRequestAccepted,
        EventType::FriendRequestRejected,
        EventType::FriendRequestCancelled,
        EventType::FriendRemoved,
        EventType::ChatCreated,
        EventType::Presence,
        EventType::ProfileUpdated,
        EventType::Notification,
    ];

    /// Wire name, also used as the SSE `event:` field
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::NewMessage => "new_message",
            EventType::MessageReaction => "message_reaction",
            EventType::MessageDeleted => "message_deleted",
            EventType::MessagesRead => "messages_read",
            EventType::Typing => "typing",
            EventType::FriendRequestReceived => "friend_request_received",
            EventType::FriendRequestAccepted => "friend_request_accepted",
            EventType::FriendRequestRejected => "friend_request_rejected",
            EventType::FriendRequestCancelled => "friend_request_cancelled",
            EventType::FriendRemoved => "friend_removed",
            EventType::ChatCreated => "chat_created",
            EventType::Presence => "presence",
            EventType::ProfileUpdated => "profile_updated",
            EventType::Notification => "notification",
        }
    }
}

impl FromStr for EventType {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        EventType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| SharedError::validation("types", format!("Unknown event type '{}'", s.trim())))
    }
}

/// Real-time event delivered to a user room
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RealtimeEvent {
    /// Type of event
    pub event_type: EventType,
    /// Event payload (JSON-serializable data)
    pub payload: serde_json::Value,
    /// Timestamp when event occurred (RFC3339)
    pub timestamp: String,
}

impl RealtimeEvent {
    /// Create a new real-time event from a raw JSON payload
    pub fn new(event_type: EventType, payload: serde_json::Value) -> Self {
        Self {
            event_type,
            payload,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create an event from any serializable payload
    pub fn from_payload<T: Serialize>(event_type: EventType, payload: &T) -> Result<Self, SharedError> {
        Ok(Self::new(event_type, serde_json::to_value(payload)?))
    }

    pub fn new_message(message: &ChatMessage) -> Result<Self, SharedError> {
        Self::from_payload(EventType::NewMessage, message)
    }

    pub fn message_reaction(chat_id: Uuid, message_id: Uuid, reactions: &[Reaction]) -> Result<Self, SharedError> {
        Self::from_payload(
            EventType::MessageReaction,
            &serde_json::json!({
                "chat_id": chat_id,
                "message_id": message_id,
                "reactions": reactions,
            }),
        )
    }

    pub fn message_deleted(chat_id: Uuid, message_id: Uuid) -> Self {
        Self::new(
            EventType::MessageDeleted,
            serde_json::json!({
                "chat_id": chat_id,
                "message_id": message_id,
            }),
        )
    }

    /// Read receipt for a batch of messages
    pub fn messages_read(
        chat_id: Uuid,
        reader_id: Uuid,
        message_ids: &[Uuid],
        read_at: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self::new(
            EventType::MessagesRead,
            serde_json::json!({
                "chat_id": chat_id,
                "reader_id": reader_id,
                "message_ids": message_ids,
                "read_at": read_at.to_rfc3339(),
            }),
        )
    }

    /// Create a typing event
    pub fn typing(chat_id: Uuid, user_id: Uuid, username: &str, is_typing: bool) -> Self {
        Self::new(
            EventType::Typing,
            serde_json::json!({
                "chat_id": chat_id,
                "user_id": user_id,
                "username": username,
                "is_typing": is_typing,
            }),
        )
    }

    pub fn friend_request(event_type: EventType, request: &FriendRequest) -> Result<Self, SharedError> {
        Self::from_payload(event_type, request)
    }

    /// Acceptance carries the direct chat so the sender can open it right away
    pub fn friend_request_accepted(request: &FriendRequest, chat: &Chat) -> Result<Self, SharedError> {
        Self::from_payload(
            EventType::FriendRequestAccepted,
            &serde_json::json!({
                "request": request,
                "chat": chat,
            }),
        )
    }

    pub fn friend_removed(user_id: Uuid) -> Self {
        Self::new(EventType::FriendRemoved, serde_json::json!({ "user_id": user_id }))
    }

    pub fn chat_created(chat: &Chat) -> Result<Self, SharedError> {
        Self::from_payload(EventType::ChatCreated, chat)
    }

    /// Create a presence event
    pub fn presence(user_id: Uuid, online: bool, last_seen: Option<chrono::DateTime<chrono::Utc>>) -> Self {
        Self::new(
            EventType::Presence,
            serde_json::json!({
                "user_id": user_id,
                "online": online,
                "last_seen": last_seen.map(|t| t.to_rfc3339()),
            }),
        )
    }

    pub fn profile_updated(profile: &UserProfile) -> Result<Self, SharedError> {
        Self::from_payload(EventType::ProfileUpdated, profile)
    }

    /// Create a notification event
    pub fn notification(title: &str, body: &str, data: serde_json::Value) -> Self {
        Self::new(
            EventType::Notification,
            serde_json::json!({
                "title": title,
                "body": body,
                "data": data,
            }),
        )
    }
}
