//! Users and Profile Module
//!
//! User search, public profiles and the caller's own profile and
//! notification preferences. The `users` table itself lives in
//! `auth::users`.

pub mod handlers;

pub use handlers::{get_user, search_users, set_notification_mode, set_notifications, update_profile};
