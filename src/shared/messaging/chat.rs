//! Chat Data Structure
//!
//! Represents a chat between two or more users, as seen by one participant.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::ChatMessage;
use super::user::UserProfile;
use crate::shared::error::SharedError;

/// Characters of the last message shown in chat lists
pub const PREVIEW_LEN: usize = 80;
/// Largest chat, creator included
pub const MAX_CHAT_PARTICIPANTS: usize = 50;

/// Represents a chat from the point of view of one participant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chat {
    /// Unique chat ID
    pub id: Uuid,
    /// Everyone in the chat, including the viewer
    pub participants: Vec<UserProfile>,
    /// Last message in the chat (for preview)
    pub last_message: Option<ChatMessage>,
    /// Preview text of last message
    pub last_message_preview: String,
    /// Messages from others the viewer has not read yet
    pub unread_count: u32,
    pub created_at: DateTime<Utc>,
    /// Bumped on every new message
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    pub fn participant_ids(&self) -> Vec<Uuid> {
        self.participants.iter().map(|p| p.id).collect()
    }
}

/// Request to create a chat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChatRequest {
    /// Other participants; the caller is always added
    pub participant_ids: Vec<Uuid>,
}

impl CreateChatRequest {
    /// Distinct participants other than `creator`
    pub fn others(&self, creator: Uuid) -> Result<Vec<Uuid>, SharedError> {
        let too_many = || {
            SharedError::validation(
                "participant_ids",
                format!("A chat has at most {} participants", MAX_CHAT_PARTICIPANTS),
            )
        };

        let mut seen = HashSet::new();
        let mut others = Vec::new();
        for id in &self.participant_ids {
            if *id != creator && seen.insert(*id) {
                if others.len() + 1 >= MAX_CHAT_PARTICIPANTS {
                    return Err(too_many());
                }
                others.push(*id);
            }
        }
        if others.is_empty() {
            return Err(SharedError::validation(
                "participant_ids",
                "A chat needs at least one other participant",
            ));
        }
        Ok(others)
    }
}

/// Response for listing chats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListChatsResponse {
    pub chats: Vec<Chat>,
    /// Sum of unread counts over all chats
    pub total_unread: u32,
}
