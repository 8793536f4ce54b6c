use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::posts::{Comment, CommentRow},
};

pub async fn insert_comment(
    conn: &mut SqliteConnection,
    post_id: i64,
    author_id: Uuid,
    content: &str,
    date: DateTime<Utc>,
) -> AppResult<Comment> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (post_id, author_id, content, date)
        VALUES ($1, $2, $3, $4)
        RETURNING id, post_id, author_id, content, date
        "#,
    )
    .bind(post_id)
    .bind(author_id)
    .bind(content)
    .bind(date)
    .fetch_one(&mut *conn)
    .await?;
    Ok(comment)
}

pub async fn find_comment(
    conn: &mut SqliteConnection,
    comment_id: i64,
) -> AppResult<Option<Comment>> {
    let comment = sqlx::query_as::<_, Comment>(
        "SELECT id, post_id, author_id, content, date FROM comments WHERE id = $1",
    )
    .bind(comment_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(comment)
}

/// The `limit` newest comments of a post, with like data for `viewer_id`.
pub async fn get_latest_comment_rows(
    conn: &mut SqliteConnection,
    post_id: i64,
    viewer_id: Uuid,
    limit: i64,
) -> AppResult<Vec<CommentRow>> {
    let rows = sqlx::query_as::<_, CommentRow>(
        r#"
        SELECT c.id, c.author_id, u.username AS author_username,
               u.profile_image_minified AS author_profile_image,
               c.content, c.date,
               (SELECT COUNT(*) FROM comment_likes cl WHERE cl.comment_id = c.id) AS likes_count,
               EXISTS(SELECT 1 FROM comment_likes cl WHERE cl.comment_id = c.id AND cl.user_id = $1) AS liked
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.post_id = $2
        ORDER BY c.date DESC, c.id DESC
        LIMIT $3
        "#,
    )
    .bind(viewer_id)
    .bind(post_id)
    .bind(limit)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows)
}

pub async fn update_comment_content(
    conn: &mut SqliteConnection,
    comment_id: i64,
    content: &str,
) -> AppResult<()> {
    sqlx::query("UPDATE comments SET content = $1 WHERE id = $2")
        .bind(content)
        .bind(comment_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn delete_comment(conn: &mut SqliteConnection, comment_id: i64) -> AppResult<()> {
    sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
