//! Backend Module
//!
//! All server-side code: the Axum HTTP server, authentication, the SQLite
//! persistence layer, per-user live event rooms and notification gating.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Server initialization, application state, database pool
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`auth`** - Signup, login, logout, sessions and bearer tokens
//! - **`middleware`** - Token authentication for protected routes
//! - **`users`** - User search, public profiles, profile and preference edits
//! - **`messaging`** - Friend requests, friendships, chats and messages
//! - **`realtime`** - Per-user rooms, presence and the SSE stream
//! - **`notify`** - Fun/Control notification gating
//! - **`error`** - Backend error type and its HTTP mapping
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── middleware/     - Request middleware
//! ├── users/          - Users and profile
//! ├── messaging/      - Friends, chats and messages
//! ├── realtime/       - Live events
//! ├── notify/         - Notification gating
//! └── error/          - Error types
//! ```
//!
//! # State Management
//!
//! `AppState` holds the database pool, the room registry, the token keys
//! and the configuration. It is cheap to clone and handed to every handler.
//! The room registry is the only in-process mutable state.
//!
//! # Error Handling
//!
//! Handlers return `BackendResult<T>`. Every `BackendError` renders as a
//! JSON body `{"error": ..., "status": ...}` with the mapped status code.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Authentication and sessions
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Users and profile handlers
pub mod users;

/// Friend requests, chats and messages
pub mod messaging;

/// Real-time update system
pub mod realtime;

/// Notification gating
pub mod notify;

/// Backend error types
pub mod error;

/// Re-export commonly used types
pub use error::{BackendError, BackendResult};
pub use realtime::{handle_realtime_subscription, RoomRegistry};
pub use server::{create_app, AppState};
