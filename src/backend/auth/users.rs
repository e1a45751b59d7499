/**
 * User Model and Database Operations
 *
 * This module handles the `users` table: account creation, lookups by id,
 * username or email, search, profile edits and notification preferences.
 */

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::shared::messaging::{AccountResponse, NotificationMode, UpdateProfileRequest, UserProfile};

pub(crate) const USER_COLUMNS: &str = "id, username, email, password_hash, display_name, bio, avatar_url, \
     notification_mode, notifications_enabled, last_seen, created_at, updated_at";

/// User struct representing a row of the `users` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: Uuid,
    /// Username (unique, case-insensitive)
    pub username: String,
    /// User email address (unique, case-insensitive)
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    /// `fun` or `control`
    pub notification_mode: String,
    pub notifications_enabled: bool,
    /// Last time the user's final live connection closed
    pub last_seen: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Parsed notification mode; unknown values fall back to the default
    pub fn mode(&self) -> NotificationMode {
        NotificationMode::from_str(&self.notification_mode).unwrap_or_default()
    }

    pub fn display_name_or_username(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }

    /// Public profile; `is_online` is filled from the room registry
    pub fn to_profile(&self, is_online: bool) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            bio: self.bio.clone(),
            avatar_url: self.avatar_url.clone(),
            is_online,
            last_seen: self.last_seen,
        }
    }

    /// The owner's view of the account
    pub fn to_account(&self) -> AccountResponse {
        AccountResponse {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            bio: self.bio.clone(),
            avatar_url: self.avatar_url.clone(),
            notification_mode: self.mode(),
            notifications_enabled: self.notifications_enabled,
            created_at: self.created_at,
        }
    }
}

/// Create a new user with default preferences (Control mode, notifications on)
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, password_hash, notification_mode, notifications_enabled, last_seen, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, 1, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(NotificationMode::default().as_str())
    .bind(now)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    get_user_by_id(pool, id).await?.ok_or(sqlx::Error::RowNotFound)
}

/// Get user by ID
pub async fn get_user_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
    sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Get user by username (case-insensitive)
pub async fn get_user_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>, sqlx::Error> {
    let sql = format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS);
    sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await
}

/// Get user by email (case-insensitive)
pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    let sql = format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS);
    sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Look a user up by username, or by email when the identifier contains `@`
pub async fn get_user_by_identifier(pool: &SqlitePool, identifier: &str) -> Result<Option<User>, sqlx::Error> {
    if identifier.contains('@') {
        get_user_by_email(pool, identifier).await
    } else {
        get_user_by_username(pool, identifier).await
    }
}

/// Users whose username or display name contains `query`, excluding `exclude`
pub async fn search_users(
    pool: &SqlitePool,
    query: &str,
    exclude: Uuid,
    limit: i64,
) -> Result<Vec<User>, sqlx::Error> {
    let pattern = format!("%{}%", escape_like(query));
    let sql = format!(
        r#"
        SELECT {}
        FROM users
        WHERE id != ?
          AND (username LIKE ? ESCAPE '\' OR display_name LIKE ? ESCAPE '\')
        ORDER BY username COLLATE NOCASE
        LIMIT ?
        "#,
        USER_COLUMNS
    );
    sqlx::query_as::<_, User>(&sql)
        .bind(exclude)
        .bind(&pattern)
        .bind(&pattern)
        .bind(limit)
        .fetch_all(pool)
        .await
}

fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Apply a partial profile update
///
/// Absent fields keep their value, blank strings clear the field.
pub async fn update_profile(
    pool: &SqlitePool,
    user: &User,
    update: &UpdateProfileRequest,
) -> Result<User, sqlx::Error> {
    fn merge(current: &Option<String>, requested: &Option<String>) -> Option<String> {
        match requested {
            None => current.clone(),
            Some(value) if value.trim().is_empty() => None,
            Some(value) => Some(value.trim().to_string()),
        }
    }

    sqlx::query(
        r#"
        UPDATE users
        SET display_name = ?, bio = ?, avatar_url = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(merge(&user.display_name, &update.display_name))
    .bind(merge(&user.bio, &update.bio))
    .bind(merge(&user.avatar_url, &update.avatar_url))
    .bind(Utc::now())
    .bind(user.id)
    .execute(pool)
    .await?;

    get_user_by_id(pool, user.id).await?.ok_or(sqlx::Error::RowNotFound)
}

/// Switch notification mode. Fun mode always turns notifications on.
pub async fn set_notification_mode(
    pool: &SqlitePool,
    user_id: Uuid,
    mode: NotificationMode,
) -> Result<User, sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE users
        SET notification_mode = ?,
            notifications_enabled = CASE WHEN ? = 'fun' THEN 1 ELSE notifications_enabled END,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(mode.as_str())
    .bind(mode.as_str())
    .bind(Utc::now())
    .bind(user_id)
    .execute(pool)
    .await?;

    get_user_by_id(pool, user_id).await?.ok_or(sqlx::Error::RowNotFound)
}

pub async fn set_notifications_enabled(
    pool: &SqlitePool,
    user_id: Uuid,
    enabled: bool,
) -> Result<User, sqlx::Error> {
    sqlx::query("UPDATE users SET notifications_enabled = ?, updated_at = ? WHERE id = ?")
        .bind(enabled)
        .bind(Utc::now())
        .bind(user_id)
        .execute(pool)
        .await?;

    get_user_by_id(pool, user_id).await?.ok_or(sqlx::Error::RowNotFound)
}

/// Record when the user was last connected
pub async fn touch_last_seen(pool: &SqlitePool, user_id: Uuid, at: DateTime<Utc>) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET last_seen = ? WHERE id = ?")
        .bind(at)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}
