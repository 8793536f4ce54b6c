use chrono::Utc;
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::likes::{LikeRow, LikeTarget},
};

pub async fn has_liked(
    conn: &mut SqliteConnection,
    target: LikeTarget,
    user_id: Uuid,
) -> AppResult<bool> {
    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = $1 AND user_id = $2)",
        target.table(),
        target.column()
    );
    let exists: bool = sqlx::query_scalar(&sql)
        .bind(target.id())
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(exists)
}

pub async fn insert_like(
    conn: &mut SqliteConnection,
    target: LikeTarget,
    user_id: Uuid,
) -> AppResult<()> {
    let sql = format!(
        "INSERT INTO {} ({}, user_id, created_at) VALUES ($1, $2, $3)",
        target.table(),
        target.column()
    );
    sqlx::query(&sql)
        .bind(target.id())
        .bind(user_id)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await
        .map_err(|e| match e.as_database_error() {
            // a concurrent like won the race
            Some(db_err) if db_err.is_unique_violation() => {
                AppError::BadRequest(anyhow::anyhow!("Already liked."))
            }
            _ => AppError::InternalServerError(anyhow::anyhow!("Failed to insert like: {}", e)),
        })?;
    Ok(())
}

/// Returns whether a like was removed.
pub async fn delete_like(
    conn: &mut SqliteConnection,
    target: LikeTarget,
    user_id: Uuid,
) -> AppResult<bool> {
    let sql = format!(
        "DELETE FROM {} WHERE {} = $1 AND user_id = $2",
        target.table(),
        target.column()
    );
    let result = sqlx::query(&sql)
        .bind(target.id())
        .bind(user_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count_likes(conn: &mut SqliteConnection, target: LikeTarget) -> AppResult<i64> {
    let sql = format!(
        "SELECT COUNT(*) FROM {} WHERE {} = $1",
        target.table(),
        target.column()
    );
    let count: i64 = sqlx::query_scalar(&sql)
        .bind(target.id())
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

/// Every like on the target, oldest first.
pub async fn get_likes(conn: &mut SqliteConnection, target: LikeTarget) -> AppResult<Vec<LikeRow>> {
    let sql = format!(
        r#"
        SELECT l.{column} AS target_id, u.id AS user_id, u.username, u.name,
               u.profile_image_minified AS profile_image
        FROM {table} l
        JOIN users u ON u.id = l.user_id
        WHERE l.{column} = $1
        ORDER BY l.created_at, l.rowid
        "#,
        column = target.column(),
        table = target.table()
    );
    let likes = sqlx::query_as::<_, LikeRow>(&sql)
        .bind(target.id())
        .fetch_all(&mut *conn)
        .await?;
    Ok(likes)
}
