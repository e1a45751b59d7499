//! Shared Module
//!
//! This module contains the plain data types that cross the API boundary:
//! request and response bodies, the records returned to clients, and the
//! real-time event envelope pushed into user rooms.
//!
//! # Overview
//!
//! Nothing in here touches the database or the network. Types are
//! serializable with serde and carry the small pieces of domain logic that
//! do not need I/O (validation, status transitions, previews, notification
//! gating).

/// Real-time event envelope
pub mod event;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Users, friend requests, chats and messages
pub mod messaging;

/// Re-export commonly used types for convenience
pub use event::{RealtimeEvent, EventType};
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
