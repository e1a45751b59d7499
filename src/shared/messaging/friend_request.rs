//! Friend Request Data Structure
//!
//! Represents friend requests between users and the status machine they
//! move through. Only a pending request can change, and only once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::chat::Chat;
use super::user::UserProfile;
use crate::shared::error::SharedError;

/// Status of a friend request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FriendRequestStatus {
    /// Request is pending
    #[default]
    Pending,
    /// Request was accepted by the recipient
    Accepted,
    /// Request was rejected by the recipient
    Rejected,
    /// Request was withdrawn by the sender
    Cancelled,
}

impl FriendRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FriendRequestStatus::Pending => "pending",
            FriendRequestStatus::Accepted => "accepted",
            FriendRequestStatus::Rejected => "rejected",
            FriendRequestStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(FriendRequestStatus::Pending),
            "accepted" => Some(FriendRequestStatus::Accepted),
            "rejected" => Some(FriendRequestStatus::Rejected),
            "cancelled" => Some(FriendRequestStatus::Cancelled),
            _ => None,
        }
    }

    /// Pending is the only non-terminal status
    pub fn can_transition_to(&self, next: FriendRequestStatus) -> bool {
        matches!(
            (self, next),
            (
                FriendRequestStatus::Pending,
                FriendRequestStatus::Accepted | FriendRequestStatus::Rejected | FriendRequestStatus::Cancelled
            )
        )
    }
}

/// Represents a friend request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FriendRequest {
    /// Unique request ID
    pub id: Uuid,
    /// User who sent the request
    pub from_user_id: Uuid,
    /// User who received the request
    pub to_user_id: Uuid,
    /// Username of the sender
    pub from_username: String,
    /// Username of the recipient
    pub to_username: String,
    /// Current status of the request
    #[serde(default)]
    pub status: FriendRequestStatus,
    /// When the request was created
    pub created_at: DateTime<Utc>,
    /// When the request left the pending state
    pub responded_at: Option<DateTime<Utc>>,
}

impl FriendRequest {
    /// Create a new pending friend request
    pub fn new(from_user_id: Uuid, to_user_id: Uuid, from_username: String, to_username: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_user_id,
            to_user_id,
            from_username,
            to_username,
            status: FriendRequestStatus::Pending,
            created_at: Utc::now(),
            responded_at: None,
        }
    }

    /// Check if the request is pending
    pub fn is_pending(&self) -> bool {
        self.status == FriendRequestStatus::Pending
    }

    /// Move the request to `next`, stamping `responded_at`
    pub fn transition(&mut self, next: FriendRequestStatus, at: DateTime<Utc>) -> Result<(), SharedError> {
        if !self.status.can_transition_to(next) {
            return Err(SharedError::transition(self.status.as_str(), next.as_str()));
        }
        self.status = next;
        self.responded_at = Some(at);
        Ok(())
    }

    /// The user on the other side of the request from `user_id`
    pub fn counterpart(&self, user_id: Uuid) -> Uuid {
        if self.from_user_id == user_id {
            self.to_user_id
        } else {
            self.from_user_id
        }
    }
}

/// Request to send a friend request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendFriendRequestRequest {
    /// Username or email of the user to send the request to
    pub to: String,
}

/// Response for listing pending friend requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListFriendRequestsResponse {
    /// Pending requests addressed to the caller
    pub incoming: Vec<FriendRequest>,
    /// Pending requests the caller sent
    pub outgoing: Vec<FriendRequest>,
}

/// Response for accepting a friend request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptFriendRequestResponse {
    pub request: FriendRequest,
    /// The direct chat between the two users, found or created
    pub chat: Chat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListFriendsResponse {
    pub friends: Vec<UserProfile>,
}
