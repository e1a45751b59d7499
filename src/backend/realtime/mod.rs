//! Real-time Update Module
//!
//! Live events for signed-in users: messages, reactions, read receipts,
//! typing indicators, friend-request changes, presence and notifications.
//!
//! # Architecture
//!
//! - **`broadcast`** - Per-user rooms (`RoomRegistry`) and event emission
//! - **`presence`** - Online/offline tracking driven by open streams
//! - **`subscription`** - Server-Sent Events handler for `/realtime`
//!
//! # Example
//!
//! ```rust
//! use chatline::backend::realtime::RoomRegistry;
//! use chatline::shared::RealtimeEvent;
//! use uuid::Uuid;
//!
//! let rooms = RoomRegistry::new(64);
//! let user_id = Uuid::new_v4();
//! let _rx = rooms.subscribe(user_id);
//! let delivered = rooms.emit(user_id, RealtimeEvent::typing(Uuid::new_v4(), Uuid::new_v4(), "bob", true));
//! assert_eq!(delivered, 1);
//! ```

/// Per-user rooms and event emission
pub mod broadcast;

/// Presence tracking
pub mod presence;

/// Server-Sent Events subscription handler
pub mod subscription;

pub use broadcast::{broadcast_event, RealtimeEventBroadcast, RoomRegistry};
pub use presence::PresenceGuard;
pub use subscription::handle_realtime_subscription;
