//! Authentication Module
//!
//! This module handles user registration, login, logout and the current
//! user endpoint, plus the database operations behind them.
//!
//! # Architecture
//!
//! - **`users`** - User model and database operations
//! - **`sessions`** - Server-side sessions and the JWT tokens that reference them
//! - **`handlers`** - HTTP handlers for authentication endpoints
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model and database operations
//! ├── sessions.rs     - Sessions and token signing
//! └── handlers/       - HTTP handlers
//!     ├── mod.rs      - Handler exports
//!     ├── types.rs    - Request/response types
//!     ├── signup.rs   - User registration handler
//!     ├── login.rs    - User authentication handler
//!     ├── logout.rs   - Session termination handler
//!     └── me.rs       - Get current user handler
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Signup**: username, email and password → user created → session + token returned
//! 2. **Login**: username or email and password → credentials verified → session + token returned
//! 3. **Logout**: token → session deleted, the token stops working
//! 4. **Me**: token → private account view
//!
//! # Security
//!
//! - Passwords are hashed with bcrypt on a blocking thread
//! - Unknown users and wrong passwords get the same 401 response
//! - Tokens expire with their session

/// User model and database operations
pub mod users;

/// Sessions and token signing
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

// Re-export commonly used types and handlers
pub use handlers::types::{AuthResponse, LoginRequest, SignupRequest};
pub use handlers::{get_me, login, logout, signup};
pub use sessions::{SharedTokenKeys, TokenKeys};
