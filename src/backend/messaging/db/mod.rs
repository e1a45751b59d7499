//! Database operations for messaging
//!
//! - **`friends`** - Friend requests and friendships
//! - **`chats`** - Chats and participants
//! - **`messages`** - Messages, reactions and read receipts

pub mod friends;
pub mod chats;
pub mod messages;

pub use chats::*;
pub use friends::*;
pub use messages::*;
