/**
 * Session Management and JWT Tokens
 *
 * A login creates a row in `sessions` and hands out an HS256 token that
 * names both the user (`sub`) and the session (`sid`). A token is only
 * accepted while its session row exists and has not expired, so logging
 * out revokes it.
 */

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Session ID
    pub sid: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

impl Claims {
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }

    pub fn session_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sid).ok()
    }
}

/// Signing keys and session lifetime, built once from the configured secret
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    session_ttl: Duration,
}

/// Shared handle stored in the application state
pub type SharedTokenKeys = Arc<TokenKeys>;

impl TokenKeys {
    /// Lifetimes beyond what `Duration` can hold saturate; `create_session`
    /// rejects them
    pub fn new(secret: &str, session_ttl_hours: u64) -> Self {
        let session_ttl = i64::try_from(session_ttl_hours)
            .ok()
            .and_then(Duration::try_hours)
            .unwrap_or(Duration::MAX);
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            session_ttl,
        }
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// Create a JWT token for a session
    pub fn create_token(&self, session: &Session) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: session.user_id.to_string(),
            sid: session.id.to_string(),
            exp: session.expires_at.timestamp().max(0) as u64,
            iat: session.created_at.timestamp().max(0) as u64,
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Verify signature and expiry, returning the claims
    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let token_data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(token_data.claims)
    }
}

/// A row of the `sessions` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Start a new session for `user_id`
pub async fn create_session(pool: &SqlitePool, user_id: Uuid, ttl: Duration) -> Result<Session, sqlx::Error> {
    let now = Utc::now();
    let expires_at = now
        .checked_add_signed(ttl)
        .ok_or_else(|| sqlx::Error::Configuration("session lifetime is out of range".into()))?;
    let session = Session {
        id: Uuid::new_v4(),
        user_id,
        created_at: now,
        expires_at,
    };

    sqlx::query("INSERT INTO sessions (id, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)")
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(pool)
        .await?;

    Ok(session)
}

/// Session by id, if it exists and has not expired at `now`
pub async fn get_active_session(
    pool: &SqlitePool,
    session_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Option<Session>, sqlx::Error> {
    let row = sqlx::query("SELECT id, user_id, created_at, expires_at FROM sessions WHERE id = ?")
        .bind(session_id)
        .fetch_optional(pool)
        .await?;

    Ok(row
        .map(|r| Session {
            id: r.get("id"),
            user_id: r.get("user_id"),
            created_at: r.get("created_at"),
            expires_at: r.get("expires_at"),
        })
        .filter(|session| !session.is_expired(now)))
}

/// End a session. Returns false if it was already gone.
pub async fn delete_session(pool: &SqlitePool, session_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
        .bind(session_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Drop every session that expired before `now`
pub async fn delete_expired_sessions(pool: &SqlitePool, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE julianday(expires_at) <= julianday(?)")
        .bind(now)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
