//! Server Module
//!
//! Server initialization and the shared application state.
//!
//! - **`state`** - `AppState` and its `FromRef` implementations
//! - **`config`** - Database pool creation and migrations
//! - **`init`** - State assembly, background tasks and app creation
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Database loading
//! └── init.rs         - Server initialization and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Database**: open the SQLite pool and run embedded migrations
//! 2. **State**: build signing keys and the room registry
//! 3. **Background Tasks**: periodic room and session cleanup
//! 4. **Router**: configure routes and middleware

/// Application state management
pub mod state;

/// Database loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use init::{build_state, create_app};
pub use state::AppState;
