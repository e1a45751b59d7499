//! Chats and their participants

use chrono::{DateTime, Utc};
use sqlx::{Executor, Row, Sqlite, SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::messages::get_message;
use crate::backend::auth::users::{User, USER_COLUMNS};
use crate::shared::messaging::chat::PREVIEW_LEN;
use crate::shared::messaging::Chat;

/// Create a chat with the given participants
pub async fn insert_chat(conn: &mut SqliteConnection, participants: &[Uuid]) -> Result<Uuid, sqlx::Error> {
    let chat_id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query("INSERT INTO chats (id, created_at, updated_at, last_message_id) VALUES (?, ?, ?, NULL)")
        .bind(chat_id)
        .bind(now)
        .bind(now)
        .execute(&mut *conn)
        .await?;

    for user_id in participants {
        sqlx::query(
            r#"
            INSERT INTO chat_participants (chat_id, user_id, unread_count, last_read_at, joined_at)
            VALUES (?, ?, 0, NULL, ?)
            "#,
        )
        .bind(chat_id)
        .bind(user_id)
        .bind(now)
        .execute(&mut *conn)
        .await?;
    }

    Ok(chat_id)
}

/// Create a chat in its own transaction
pub async fn create_chat(pool: &SqlitePool, participants: &[Uuid]) -> Result<Uuid, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let chat_id = insert_chat(&mut *tx, participants).await?;
    tx.commit().await?;
    Ok(chat_id)
}

/// The chat whose only participants are `a` and `b`
pub async fn find_direct_chat(conn: &mut SqliteConnection, a: Uuid, b: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT mine.chat_id
        FROM chat_participants mine
        JOIN chat_participants theirs ON theirs.chat_id = mine.chat_id AND theirs.user_id = ?
        WHERE mine.user_id = ?
          AND (SELECT COUNT(*) FROM chat_participants p WHERE p.chat_id = mine.chat_id) = 2
        LIMIT 1
        "#,
    )
    .bind(b)
    .bind(a)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.map(|r| r.get("chat_id")))
}

/// Existing direct chat between `a` and `b`, or a new one
///
/// The flag is true when the chat was created.
pub async fn find_or_create_direct_chat(
    conn: &mut SqliteConnection,
    a: Uuid,
    b: Uuid,
) -> Result<(Uuid, bool), sqlx::Error> {
    if let Some(chat_id) = find_direct_chat(&mut *conn, a, b).await? {
        return Ok((chat_id, false));
    }
    let chat_id = insert_chat(&mut *conn, &[a, b]).await?;
    Ok((chat_id, true))
}

pub async fn chat_exists<'e, E>(executor: E, chat_id: Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query("SELECT 1 FROM chats WHERE id = ?")
        .bind(chat_id)
        .fetch_optional(executor)
        .await?;
    Ok(row.is_some())
}

pub async fn is_participant<'e, E>(executor: E, chat_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query("SELECT 1 FROM chat_participants WHERE chat_id = ? AND user_id = ?")
        .bind(chat_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await?;
    Ok(row.is_some())
}

/// Participants of a chat in the order they joined
pub async fn participant_ids<'e, E>(executor: E, chat_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query("SELECT user_id FROM chat_participants WHERE chat_id = ? ORDER BY rowid")
        .bind(chat_id)
        .fetch_all(executor)
        .await?;
    Ok(rows.iter().map(|r| r.get("user_id")).collect())
}

/// Users taking part in a chat
pub async fn participants(pool: &SqlitePool, chat_id: Uuid) -> Result<Vec<User>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM users WHERE id IN (SELECT user_id FROM chat_participants WHERE chat_id = ?) \
         ORDER BY username COLLATE NOCASE",
        USER_COLUMNS
    );
    sqlx::query_as::<_, User>(&sql).bind(chat_id).fetch_all(pool).await
}

pub async fn list_chat_ids_for_user(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    let rows = sqlx::query("SELECT chat_id FROM chat_participants WHERE user_id = ?")
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().map(|r| r.get("chat_id")).collect())
}

/// A chat as seen by `viewer`: participants, last message and the viewer's unread count
///
/// Participants come back with `is_online = false`; callers fill presence in.
pub async fn load_chat(pool: &SqlitePool, chat_id: Uuid, viewer: Uuid) -> Result<Option<Chat>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT c.created_at, c.updated_at, c.last_message_id, p.unread_count
        FROM chats c
        JOIN chat_participants p ON p.chat_id = c.id AND p.user_id = ?
        WHERE c.id = ?
        "#,
    )
    .bind(viewer)
    .bind(chat_id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let created_at: DateTime<Utc> = row.get("created_at");
    let updated_at: DateTime<Utc> = row.get("updated_at");
    let last_message_id: Option<Uuid> = row.get("last_message_id");
    let unread_count: i64 = row.get("unread_count");

    let participants = participants(pool, chat_id)
        .await?
        .iter()
        .map(|user| user.to_profile(false))
        .collect();

    let last_message = match last_message_id {
        Some(id) => get_message(pool, id).await?,
        None => None,
    };

    Ok(Some(Chat {
        id: chat_id,
        participants,
        last_message_preview: last_message
            .as_ref()
            .map(|m| m.preview(PREVIEW_LEN))
            .unwrap_or_default(),
        last_message,
        unread_count: u32::try_from(unread_count.max(0)).unwrap_or(u32::MAX),
        created_at,
        updated_at,
    }))
}
