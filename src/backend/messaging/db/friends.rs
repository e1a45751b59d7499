//! Friend requests and friendships
//!
//! Friendships are stored once per direction so "friends of X" is a single
//! indexed lookup.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite, SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::chats::find_or_create_direct_chat;
use crate::backend::auth::users::{User, USER_COLUMNS};
use crate::shared::messaging::{FriendRequest, FriendRequestStatus};

const REQUEST_SELECT: &str = r#"
    SELECT fr.id, fr.from_user_id, fr.to_user_id,
           fu.username AS from_username, tu.username AS to_username,
           fr.status, fr.created_at, fr.responded_at
    FROM friend_requests fr
    JOIN users fu ON fu.id = fr.from_user_id
    JOIN users tu ON tu.id = fr.to_user_id
"#;

fn request_from_row(row: &SqliteRow) -> Result<FriendRequest, sqlx::Error> {
    let status: String = row.try_get("status")?;
    let status = FriendRequestStatus::from_str(&status).ok_or_else(|| sqlx::Error::ColumnDecode {
        index: "status".to_string(),
        source: format!("unknown friend request status '{}'", status).into(),
    })?;

    Ok(FriendRequest {
        id: row.try_get("id")?,
        from_user_id: row.try_get("from_user_id")?,
        to_user_id: row.try_get("to_user_id")?,
        from_username: row.try_get("from_username")?,
        to_username: row.try_get("to_username")?,
        status,
        created_at: row.try_get("created_at")?,
        responded_at: row.try_get("responded_at")?,
    })
}

/// Create a new pending friend request
///
/// At most one pending request may exist per pair of users, in either
/// direction. A second one fails with a unique violation.
pub async fn create_friend_request(
    pool: &SqlitePool,
    from: &User,
    to: &User,
) -> Result<FriendRequest, sqlx::Error> {
    let request = FriendRequest::new(from.id, to.id, from.username.clone(), to.username.clone());

    sqlx::query(
        r#"
        INSERT INTO friend_requests (id, from_user_id, to_user_id, status, created_at, responded_at)
        VALUES (?, ?, ?, 'pending', ?, NULL)
        "#,
    )
    .bind(request.id)
    .bind(request.from_user_id)
    .bind(request.to_user_id)
    .bind(request.created_at)
    .execute(pool)
    .await?;

    Ok(request)
}

/// Get a friend request by ID
pub async fn get_friend_request(pool: &SqlitePool, request_id: Uuid) -> Result<Option<FriendRequest>, sqlx::Error> {
    let sql = format!("{} WHERE fr.id = ?", REQUEST_SELECT);
    let row = sqlx::query(&sql).bind(request_id).fetch_optional(pool).await?;
    row.as_ref().map(request_from_row).transpose()
}

/// A pending request between `a` and `b`, in either direction
pub async fn pending_request_between(
    pool: &SqlitePool,
    a: Uuid,
    b: Uuid,
) -> Result<Option<FriendRequest>, sqlx::Error> {
    let sql = format!(
        "{} WHERE fr.status = 'pending' \
         AND ((fr.from_user_id = ? AND fr.to_user_id = ?) OR (fr.from_user_id = ? AND fr.to_user_id = ?)) \
         LIMIT 1",
        REQUEST_SELECT
    );
    let row = sqlx::query(&sql)
        .bind(a)
        .bind(b)
        .bind(b)
        .bind(a)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(request_from_row).transpose()
}

/// Pending requests addressed to `user_id`, newest first
pub async fn list_incoming_requests(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<FriendRequest>, sqlx::Error> {
    let sql = format!(
        "{} WHERE fr.to_user_id = ? AND fr.status = 'pending' ORDER BY fr.rowid DESC",
        REQUEST_SELECT
    );
    let rows = sqlx::query(&sql).bind(user_id).fetch_all(pool).await?;
    rows.iter().map(request_from_row).collect()
}

/// Pending requests sent by `user_id`, newest first
pub async fn list_outgoing_requests(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<FriendRequest>, sqlx::Error> {
    let sql = format!(
        "{} WHERE fr.from_user_id = ? AND fr.status = 'pending' ORDER BY fr.rowid DESC",
        REQUEST_SELECT
    );
    let rows = sqlx::query(&sql).bind(user_id).fetch_all(pool).await?;
    rows.iter().map(request_from_row).collect()
}

/// Persist a status change made with `FriendRequest::transition`
///
/// Only applies while the stored row is still pending. Returns false when
/// another request got there first.
pub async fn update_request_status<'e, E>(executor: E, request: &FriendRequest) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        UPDATE friend_requests
        SET status = ?, responded_at = ?
        WHERE id = ? AND status = 'pending'
        "#,
    )
    .bind(request.status.as_str())
    .bind(request.responded_at)
    .bind(request.id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Accept a request: status, friendship and the direct chat in one transaction
///
/// `request` must already be transitioned to accepted. Returns the chat id
/// and whether the chat was created, or `None` if the request was no
/// longer pending.
pub async fn accept_friend_request(
    pool: &SqlitePool,
    request: &FriendRequest,
) -> Result<Option<(Uuid, bool)>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    if !update_request_status(&mut *tx, request).await? {
        return Ok(None);
    }

    add_friendship(&mut *tx, request.from_user_id, request.to_user_id).await?;
    let chat = find_or_create_direct_chat(&mut *tx, request.from_user_id, request.to_user_id).await?;

    tx.commit().await?;
    Ok(Some(chat))
}

/// Record a friendship in both directions
pub async fn add_friendship(conn: &mut SqliteConnection, a: Uuid, b: Uuid) -> Result<(), sqlx::Error> {
    let now = Utc::now();
    for (user_id, friend_id) in [(a, b), (b, a)] {
        sqlx::query("INSERT OR IGNORE INTO friendships (user_id, friend_id, created_at) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(friend_id)
            .bind(now)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Delete a friendship in both directions. Returns false if there was none.
pub async fn remove_friendship(pool: &SqlitePool, a: Uuid, b: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM friendships
        WHERE (user_id = ? AND friend_id = ?) OR (user_id = ? AND friend_id = ?)
        "#,
    )
    .bind(a)
    .bind(b)
    .bind(b)
    .bind(a)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn are_friends<'e, E>(executor: E, a: Uuid, b: Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query("SELECT 1 FROM friendships WHERE user_id = ? AND friend_id = ?")
        .bind(a)
        .bind(b)
        .fetch_optional(executor)
        .await?;
    Ok(row.is_some())
}

/// Friends of `user_id`, by username
pub async fn list_friends(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<User>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM users WHERE id IN (SELECT friend_id FROM friendships WHERE user_id = ?) \
         ORDER BY username COLLATE NOCASE",
        USER_COLUMNS
    );
    sqlx::query_as::<_, User>(&sql).bind(user_id).fetch_all(pool).await
}

pub async fn list_friend_ids(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    let rows = sqlx::query("SELECT friend_id FROM friendships WHERE user_id = ?")
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().map(|r| r.get("friend_id")).collect())
}
