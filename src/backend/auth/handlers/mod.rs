//! Authentication Handlers Module
//!
//! # Handlers
//!
//! - **`signup`** - POST /api/auth/signup - User registration
//! - **`login`** - POST /api/auth/login - User authentication
//! - **`logout`** - POST /api/auth/logout - End the current session
//! - **`get_me`** - GET /api/auth/me - Get current user info

/// Request and response types
pub mod types;

/// Signup handler
pub mod signup;

/// Login handler
pub mod login;

/// Logout handler
pub mod logout;

/// Get current user handler
pub mod me;

// Re-export commonly used types
pub use types::{AuthResponse, LoginRequest, SignupRequest};

// Re-export handlers
pub use signup::signup;
pub use login::login;
pub use logout::logout;
pub use me::get_me;
