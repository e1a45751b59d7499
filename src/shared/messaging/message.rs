//! Chat Message Data Structure
//!
//! Represents a message in a chat, its reactions and read receipts, and
//! the request/response bodies of the message endpoints.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;

pub const MAX_MESSAGE_LEN: usize = 4000;
pub const MAX_EMOJI_LEN: usize = 16;
pub const MAX_FORWARD_TARGETS: usize = 10;
pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const MAX_PAGE_SIZE: u32 = 100;

/// A single user's reaction to a message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reaction {
    pub user_id: Uuid,
    pub emoji: String,
    pub created_at: DateTime<Utc>,
}

/// A user has read a message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadReceipt {
    pub user_id: Uuid,
    pub read_at: DateTime<Utc>,
}

/// Represents a chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// Unique message ID
    pub id: Uuid,
    /// Chat this message belongs to
    pub chat_id: Uuid,
    /// User who sent the message
    pub sender_id: Uuid,
    /// Message text; empty once deleted
    pub content: String,
    /// Message this one replies to (same chat)
    pub reply_to: Option<Uuid>,
    /// Original message when this is a forwarded copy
    pub forwarded_from: Option<Uuid>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    #[serde(default)]
    pub read_by: Vec<ReadReceipt>,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a new text message
    pub fn new_text(chat_id: Uuid, sender_id: Uuid, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            chat_id,
            sender_id,
            content,
            reply_to: None,
            forwarded_from: None,
            reactions: Vec::new(),
            read_by: Vec::new(),
            deleted: false,
            created_at: Utc::now(),
        }
    }

    /// Copy of `original` posted into `chat_id` by `sender_id`
    pub fn forwarded(original: &ChatMessage, chat_id: Uuid, sender_id: Uuid) -> Self {
        let mut message = Self::new_text(chat_id, sender_id, original.content.clone());
        // A forward of a forward still points at the first message
        message.forwarded_from = Some(original.forwarded_from.unwrap_or(original.id));
        message
    }

    /// Get a preview of the message (first N characters)
    pub fn preview(&self, max_len: usize) -> String {
        if self.deleted {
            return "Message deleted".to_string();
        }
        if self.content.chars().count() <= max_len {
            self.content.clone()
        } else {
            let mut preview: String = self.content.chars().take(max_len.saturating_sub(3)).collect();
            preview.push_str("...");
            preview
        }
    }

    pub fn is_read_by(&self, user_id: Uuid) -> bool {
        self.read_by.iter().any(|r| r.user_id == user_id)
    }
}

/// Reactions grouped by emoji
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReactionCount {
    pub emoji: String,
    pub count: usize,
    pub user_ids: Vec<Uuid>,
}

/// Group reactions by emoji, most used first, ties broken by emoji
pub fn summarize_reactions(reactions: &[Reaction]) -> Vec<ReactionCount> {
    let mut counts: Vec<ReactionCount> = Vec::new();
    for reaction in reactions {
        match counts.iter_mut().find(|c| c.emoji == reaction.emoji) {
            Some(entry) => {
                entry.count += 1;
                entry.user_ids.push(reaction.user_id);
            }
            None => counts.push(ReactionCount {
                emoji: reaction.emoji.clone(),
                count: 1,
                user_ids: vec![reaction.user_id],
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.emoji.cmp(&b.emoji)));
    counts
}

/// Outcome of a reaction request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReactionChange {
    Added,
    Replaced,
    Removed,
}

impl ReactionChange {
    /// One reaction per user: same emoji toggles off, another emoji replaces
    pub fn decide(existing: Option<&str>, requested: &str) -> Self {
        match existing {
            None => ReactionChange::Added,
            Some(current) if current == requested => ReactionChange::Removed,
            Some(_) => ReactionChange::Replaced,
        }
    }
}

/// Trim and check message text
pub fn validate_content(content: &str) -> Result<String, SharedError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(SharedError::validation("content", "Message cannot be empty"));
    }
    if trimmed.chars().count() > MAX_MESSAGE_LEN {
        return Err(SharedError::validation(
            "content",
            format!("Message must be at most {} characters", MAX_MESSAGE_LEN),
        ));
    }
    Ok(trimmed.to_string())
}

pub fn validate_emoji(emoji: &str) -> Result<String, SharedError> {
    let trimmed = emoji.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_EMOJI_LEN {
        return Err(SharedError::validation(
            "emoji",
            format!("Emoji must be 1-{} characters", MAX_EMOJI_LEN),
        ));
    }
    Ok(trimmed.to_string())
}

/// Page size with default and upper bound applied
pub fn clamp_page_size(limit: Option<u32>) -> u32 {
    limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Request to send a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
    #[serde(default)]
    pub reply_to: Option<Uuid>,
}

/// Query parameters for listing messages
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListMessagesQuery {
    pub limit: Option<u32>,
    /// Return messages older than this message
    pub before: Option<Uuid>,
}

/// Response for listing messages (newest first)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMessagesResponse {
    pub messages: Vec<ChatMessage>,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactRequest {
    pub emoji: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactResponse {
    pub message_id: Uuid,
    pub change: ReactionChange,
    pub reactions: Vec<Reaction>,
    pub summary: Vec<ReactionCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardRequest {
    pub chat_ids: Vec<Uuid>,
}

impl ForwardRequest {
    /// Target chats with duplicates removed, order kept
    pub fn targets(&self) -> Result<Vec<Uuid>, SharedError> {
        let invalid = || {
            SharedError::validation(
                "chat_ids",
                format!("Forward to between 1 and {} chats", MAX_FORWARD_TARGETS),
            )
        };

        let mut seen = HashSet::new();
        let mut targets = Vec::new();
        for id in &self.chat_ids {
            if seen.insert(*id) {
                if targets.len() == MAX_FORWARD_TARGETS {
                    return Err(invalid());
                }
                targets.push(*id);
            }
        }
        if targets.is_empty() {
            return Err(invalid());
        }
        Ok(targets)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardResponse {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypingRequest {
    pub is_typing: bool,
}

/// Read receipt produced by marking a chat as read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkReadResponse {
    pub chat_id: Uuid,
    pub message_ids: Vec<Uuid>,
    pub read_at: DateTime<Utc>,
}
