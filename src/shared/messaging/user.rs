//! User Data Structures
//!
//! Public and private views of a user account, notification preferences,
//! and the field rules applied on signup and profile edits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;

pub const MAX_DISPLAY_NAME_LEN: usize = 50;
pub const MAX_BIO_LEN: usize = 280;
pub const MAX_AVATAR_URL_LEN: usize = 2048;
pub const MIN_PASSWORD_LEN: usize = 8;

/// How push notifications are gated for a user
///
/// In `Fun` mode notifications are always on. In `Control` mode the user
/// decides with the `notifications_enabled` toggle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotificationMode {
    Fun,
    #[default]
    Control,
}

impl NotificationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationMode::Fun => "fun",
            NotificationMode::Control => "control",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fun" => Some(NotificationMode::Fun),
            "control" => Some(NotificationMode::Control),
            _ => None,
        }
    }

    /// Whether a notification may be delivered given the user's toggle
    pub fn allows(&self, notifications_enabled: bool) -> bool {
        match self {
            NotificationMode::Fun => true,
            NotificationMode::Control => notifications_enabled,
        }
    }

    /// Whether the user may flip the notification toggle in this mode
    pub fn is_toggleable(&self) -> bool {
        matches!(self, NotificationMode::Control)
    }
}

/// Profile visible to other users
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    /// Live presence, filled from the room registry
    pub is_online: bool,
    pub last_seen: DateTime<Utc>,
}

impl UserProfile {
    /// Get display name or fallback to username
    pub fn display_name_or_username(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

/// The signed-in user's own account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub notification_mode: NotificationMode,
    pub notifications_enabled: bool,
    pub created_at: DateTime<Utc>,
}

/// Partial profile update; absent fields are left alone, empty strings clear
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        if let Some(name) = &self.display_name {
            if name.chars().count() > MAX_DISPLAY_NAME_LEN {
                return Err(SharedError::validation(
                    "display_name",
                    format!("Display name must be at most {} characters", MAX_DISPLAY_NAME_LEN),
                ));
            }
        }
        if let Some(bio) = &self.bio {
            if bio.chars().count() > MAX_BIO_LEN {
                return Err(SharedError::validation(
                    "bio",
                    format!("Bio must be at most {} characters", MAX_BIO_LEN),
                ));
            }
        }
        if let Some(url) = &self.avatar_url {
            let url = url.trim();
            if !url.is_empty() && !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(SharedError::validation("avatar_url", "Avatar URL must be http(s)"));
            }
            if url.len() > MAX_AVATAR_URL_LEN {
                return Err(SharedError::validation("avatar_url", "Avatar URL is too long"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetNotificationModeRequest {
    pub mode: NotificationMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetNotificationsRequest {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchUsersQuery {
    pub q: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserProfile>,
}

/// Username rule: 3-30 chars, starts with a letter, then letters, digits or underscores
pub fn validate_username(username: &str) -> Result<(), SharedError> {
    let message = "Username must be 3-30 chars, start with a letter, and contain only letters, numbers, and underscores";
    if username.len() < 3 || username.len() > 30 {
        return Err(SharedError::validation("username", message));
    }

    let mut chars = username.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return Err(SharedError::validation("username", message)),
    }

    if chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(SharedError::validation("username", message))
    }
}

pub fn validate_email(email: &str) -> Result<(), SharedError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(SharedError::validation("email", "Invalid email format"))
    }
}

pub fn validate_password(password: &str) -> Result<(), SharedError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(SharedError::validation(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
    Ok(())
}
