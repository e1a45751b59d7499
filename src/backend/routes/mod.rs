//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! - **`router`** - Main router: health check, middleware stack, fallback
//! - **`api_routes`** - Public auth endpoints and the protected `/api` surface
//! - **`realtime_routes`** - The `/realtime` event stream
//!
//! Everything except `/health`, signup and login sits behind
//! `auth_middleware`.

/// Main router creation
pub mod router;

/// API endpoint routes
pub mod api_routes;

/// Live event stream route
pub mod realtime_routes;

pub use router::create_router;
