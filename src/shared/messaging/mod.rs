//! Messaging Module
//!
//! This module contains all the data structures for the messaging system:
//!
//! - `UserProfile` / `AccountResponse` - Users and their notification preferences
//! - `FriendRequest` - A friend request between users
//! - `Chat` - A chat between two or more users
//! - `ChatMessage` - A message in a chat, with reactions and read receipts
//!
//! # Usage
//!
//! ```rust
//! use chatline::shared::messaging::{Chat, ChatMessage, FriendRequest, UserProfile};
//! ```

pub mod user;
pub mod friend_request;
pub mod chat;
pub mod message;

// Re-export all types
pub use user::{
    AccountResponse, ListUsersResponse, NotificationMode, SearchUsersQuery,
    SetNotificationModeRequest, SetNotificationsRequest, UpdateProfileRequest, UserProfile,
};
pub use friend_request::{
    AcceptFriendRequestResponse, FriendRequest, FriendRequestStatus, ListFriendRequestsResponse,
    ListFriendsResponse, SendFriendRequestRequest,
};
pub use chat::{Chat, CreateChatRequest, ListChatsResponse};
pub use message::{
    ChatMessage, ForwardRequest, ForwardResponse, ListMessagesQuery, ListMessagesResponse,
    MarkReadResponse, ReactRequest, ReactResponse, Reaction, ReactionChange, ReactionCount,
    ReadReceipt, SendMessageRequest, TypingRequest,
};
