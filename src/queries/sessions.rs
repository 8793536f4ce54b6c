use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::{error::AppResult, models::sessions::StoredSession};

pub async fn insert_session(
    conn: &mut SqliteConnection,
    token: &str,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
) -> AppResult<()> {
    sqlx::query("INSERT INTO user_sessions (token, user_id, expires_at) VALUES ($1, $2, $3)")
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn find_active_session(
    conn: &mut SqliteConnection,
    token: &str,
    now: DateTime<Utc>,
) -> AppResult<Option<StoredSession>> {
    let session = sqlx::query_as::<_, StoredSession>(
        "SELECT token, user_id, expires_at FROM user_sessions WHERE token = $1 AND expires_at > $2",
    )
    .bind(token)
    .bind(now)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(session)
}

pub async fn extend_session(
    conn: &mut SqliteConnection,
    token: &str,
    expires_at: DateTime<Utc>,
) -> AppResult<()> {
    sqlx::query("UPDATE user_sessions SET expires_at = $1 WHERE token = $2")
        .bind(expires_at)
        .bind(token)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn delete_session(conn: &mut SqliteConnection, token: &str) -> AppResult<()> {
    sqlx::query("DELETE FROM user_sessions WHERE token = $1")
        .bind(token)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn delete_expired_sessions(
    conn: &mut SqliteConnection,
    now: DateTime<Utc>,
) -> AppResult<u64> {
    let result = sqlx::query("DELETE FROM user_sessions WHERE expires_at <= $1")
        .bind(now)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}
