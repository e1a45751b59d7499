//! Chatline - Main Library
//!
//! Chatline is a real-time one-to-one chat server: user accounts, friend
//! requests, direct messaging with reactions, forwarding and read receipts,
//! typing indicators, presence, and notification events delivered to each
//! user's live event room.
//!
//! # Module Structure
//!
//! - **`shared`** - Plain data types exchanged over the API
//!   - Users, friend requests, chats, messages, reactions
//!   - Real-time event envelope
//!   - Configuration and shared error types
//!
//! - **`backend`** - Server-side code (compiled with the `ssr` feature, on by default)
//!   - Axum HTTP server and route table
//!   - Session-backed bearer authentication
//!   - SQLite persistence through sqlx
//!   - Per-user broadcast rooms streamed over Server-Sent Events
//!
//! # Usage
//!
//! ```rust,no_run
//! use chatline::backend::server::init::create_app;
//! use chatline::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::builder().build()?;
//! let app = create_app(config).await?;
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```
//!
//! # Request Flow
//!
//! Every mutating endpoint follows the same shape: query, mutate, respond,
//! emit. Events are emitted into the rooms of the affected users only after
//! the database write has succeeded.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
