//! Messaging Module
//!
//! Friend requests, friendships, chats and messages: the database layer and
//! the HTTP handlers on top of it.

pub mod db;
pub mod handlers;

pub use handlers::*;
