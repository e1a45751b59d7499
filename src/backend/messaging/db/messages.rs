//! Messages, reactions and read receipts
//!
//! Message order within a chat is insertion order (`rowid`), which is also
//! what the `before` cursor pages over.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite, SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::shared::messaging::{ChatMessage, Reaction, ReactionChange, ReadReceipt};

const MESSAGE_COLUMNS: &str = "id, chat_id, sender_id, content, reply_to, forwarded_from, deleted, created_at";

fn message_from_row(row: &SqliteRow) -> ChatMessage {
    ChatMessage {
        id: row.get("id"),
        chat_id: row.get("chat_id"),
        sender_id: row.get("sender_id"),
        content: row.get("content"),
        reply_to: row.get("reply_to"),
        forwarded_from: row.get("forwarded_from"),
        reactions: Vec::new(),
        read_by: Vec::new(),
        deleted: row.get("deleted"),
        created_at: row.get("created_at"),
    }
}

async fn insert_message(conn: &mut SqliteConnection, message: &ChatMessage) -> Result<(), sqlx::Error> {
    let sql = format!("INSERT INTO messages ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)", MESSAGE_COLUMNS);
    sqlx::query(&sql)
        .bind(message.id)
        .bind(message.chat_id)
        .bind(message.sender_id)
        .bind(&message.content)
        .bind(message.reply_to)
        .bind(message.forwarded_from)
        .bind(message.deleted)
        .bind(message.created_at)
        .execute(&mut *conn)
        .await?;

    // Everyone but the sender has one more unread message
    sqlx::query("UPDATE chat_participants SET unread_count = unread_count + 1 WHERE chat_id = ? AND user_id != ?")
        .bind(message.chat_id)
        .bind(message.sender_id)
        .execute(&mut *conn)
        .await?;

    sqlx::query("UPDATE chats SET updated_at = ?, last_message_id = ? WHERE id = ?")
        .bind(message.created_at)
        .bind(message.id)
        .bind(message.chat_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Store a new message and update unread counts and chat activity
pub async fn record_message(pool: &SqlitePool, message: &ChatMessage) -> Result<(), sqlx::Error> {
    record_messages(pool, std::slice::from_ref(message)).await
}

/// Store several messages atomically
pub async fn record_messages(pool: &SqlitePool, messages: &[ChatMessage]) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for message in messages {
        insert_message(&mut *tx, message).await?;
    }
    tx.commit().await
}

/// A message with its reactions and read receipts
pub async fn get_message(pool: &SqlitePool, message_id: Uuid) -> Result<Option<ChatMessage>, sqlx::Error> {
    let sql = format!("SELECT {} FROM messages WHERE id = ?", MESSAGE_COLUMNS);
    let row = sqlx::query(&sql).bind(message_id).fetch_optional(pool).await?;

    match row {
        Some(row) => {
            let mut message = message_from_row(&row);
            hydrate(pool, &mut message).await?;
            Ok(Some(message))
        }
        None => Ok(None),
    }
}

async fn hydrate(pool: &SqlitePool, message: &mut ChatMessage) -> Result<(), sqlx::Error> {
    message.reactions = reactions_for(pool, message.id).await?;
    message.read_by = reads_for(pool, message.id).await?;
    Ok(())
}

/// Whether `message_id` belongs to `chat_id`
pub async fn message_in_chat(pool: &SqlitePool, chat_id: Uuid, message_id: Uuid) -> Result<bool, sqlx::Error> {
    Ok(message_position(pool, chat_id, message_id).await?.is_some())
}

/// Position of a message in its chat, used as the paging cursor
pub async fn message_position(pool: &SqlitePool, chat_id: Uuid, message_id: Uuid) -> Result<Option<i64>, sqlx::Error> {
    let row = sqlx::query("SELECT rowid FROM messages WHERE id = ? AND chat_id = ?")
        .bind(message_id)
        .bind(chat_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.get(0)))
}

/// Up to `limit` messages older than position `before`, newest first
///
/// The flag is true when older messages remain.
pub async fn list_messages(
    pool: &SqlitePool,
    chat_id: Uuid,
    limit: u32,
    before: Option<i64>,
) -> Result<(Vec<ChatMessage>, bool), sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM messages WHERE chat_id = ? AND rowid < ? ORDER BY rowid DESC LIMIT ?",
        MESSAGE_COLUMNS
    );
    let rows = sqlx::query(&sql)
        .bind(chat_id)
        .bind(before.unwrap_or(i64::MAX))
        .bind(i64::from(limit) + 1)
        .fetch_all(pool)
        .await?;

    let has_more = rows.len() > limit as usize;
    let mut messages: Vec<ChatMessage> = rows.iter().take(limit as usize).map(message_from_row).collect();
    for message in &mut messages {
        hydrate(pool, message).await?;
    }

    Ok((messages, has_more))
}

/// Reactions in the order they were first made
pub async fn reactions_for<'e, E>(executor: E, message_id: Uuid) -> Result<Vec<Reaction>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query("SELECT user_id, emoji, created_at FROM message_reactions WHERE message_id = ? ORDER BY rowid")
        .bind(message_id)
        .fetch_all(executor)
        .await?;

    Ok(rows
        .iter()
        .map(|r| Reaction {
            user_id: r.get("user_id"),
            emoji: r.get("emoji"),
            created_at: r.get("created_at"),
        })
        .collect())
}

pub async fn reads_for<'e, E>(executor: E, message_id: Uuid) -> Result<Vec<ReadReceipt>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query("SELECT user_id, read_at FROM message_reads WHERE message_id = ? ORDER BY rowid")
        .bind(message_id)
        .fetch_all(executor)
        .await?;

    Ok(rows
        .iter()
        .map(|r| ReadReceipt {
            user_id: r.get("user_id"),
            read_at: r.get("read_at"),
        })
        .collect())
}

/// Toggle, replace or add the user's reaction
///
/// Returns what happened and the message's reactions afterwards.
pub async fn apply_reaction(
    pool: &SqlitePool,
    message_id: Uuid,
    user_id: Uuid,
    emoji: &str,
) -> Result<(ReactionChange, Vec<Reaction>), sqlx::Error> {
    let mut tx = pool.begin().await?;

    let existing: Option<String> =
        sqlx::query("SELECT emoji FROM message_reactions WHERE message_id = ? AND user_id = ?")
            .bind(message_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .map(|r| r.get("emoji"));

    let change = ReactionChange::decide(existing.as_deref(), emoji);
    match change {
        ReactionChange::Removed => {
            sqlx::query("DELETE FROM message_reactions WHERE message_id = ? AND user_id = ?")
                .bind(message_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }
        ReactionChange::Added | ReactionChange::Replaced => {
            sqlx::query(
                r#"
                INSERT INTO message_reactions (message_id, user_id, emoji, created_at)
                VALUES (?, ?, ?, ?)
                ON CONFLICT (message_id, user_id) DO UPDATE SET emoji = excluded.emoji, created_at = excluded.created_at
                "#,
            )
            .bind(message_id)
            .bind(user_id)
            .bind(emoji)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        }
    }

    let reactions = reactions_for(&mut *tx, message_id).await?;
    tx.commit().await?;
    Ok((change, reactions))
}

/// Mark every unread message from others in the chat as read by `reader`
///
/// Resets the reader's unread count and returns the ids that were newly
/// marked, oldest first.
pub async fn mark_chat_read(
    pool: &SqlitePool,
    chat_id: Uuid,
    reader: Uuid,
    read_at: DateTime<Utc>,
) -> Result<Vec<Uuid>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        r#"
        SELECT m.id
        FROM messages m
        WHERE m.chat_id = ?
          AND m.sender_id != ?
          AND m.deleted = 0
          AND NOT EXISTS (SELECT 1 FROM message_reads r WHERE r.message_id = m.id AND r.user_id = ?)
        ORDER BY m.rowid
        "#,
    )
    .bind(chat_id)
    .bind(reader)
    .bind(reader)
    .fetch_all(&mut *tx)
    .await?;
    let message_ids: Vec<Uuid> = rows.iter().map(|r| r.get("id")).collect();

    for message_id in &message_ids {
        sqlx::query("INSERT OR IGNORE INTO message_reads (message_id, user_id, read_at) VALUES (?, ?, ?)")
            .bind(message_id)
            .bind(reader)
            .bind(read_at)
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query("UPDATE chat_participants SET unread_count = 0, last_read_at = ? WHERE chat_id = ? AND user_id = ?")
        .bind(read_at)
        .bind(chat_id)
        .bind(reader)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(message_ids)
}

/// Soft-delete a message: clear its text and flag it
///
/// Returns false if it was already deleted.
///
/// Participants who had not read it yet get it taken off their unread count.
pub async fn soft_delete_message(pool: &SqlitePool, message_id: Uuid) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query("UPDATE messages SET deleted = 1, content = '' WHERE id = ? AND deleted = 0")
        .bind(message_id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Ok(false);
    }

    sqlx::query(
        r#"
        UPDATE chat_participants SET unread_count = MAX(unread_count - 1, 0)
        WHERE (chat_id, user_id) IN (
            SELECT p.chat_id, p.user_id
            FROM messages m
            JOIN chat_participants p ON p.chat_id = m.chat_id
            WHERE m.id = ?
              AND p.user_id != m.sender_id
              AND julianday(p.joined_at) <= julianday(m.created_at)
              AND NOT EXISTS (SELECT 1 FROM message_reads r WHERE r.message_id = m.id AND r.user_id = p.user_id)
        )
        "#,
    )
    .bind(message_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(true)
}
