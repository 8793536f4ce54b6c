use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::posts::{Post, PostRow},
};

// $1 is always the viewing user
const POST_ROW_SELECT: &str = r#"
    SELECT p.id, p.author_id, u.username AS author_username,
           u.profile_image_minified AS author_profile_image,
           p.wall_owner_id, p.content, p.date,
           (SELECT COUNT(*) FROM post_likes pl WHERE pl.post_id = p.id) AS likes_count,
           EXISTS(SELECT 1 FROM post_likes pl WHERE pl.post_id = p.id AND pl.user_id = $1) AS liked,
           (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS total_comments_count
    FROM posts p
    JOIN users u ON u.id = p.author_id
"#;

const FRIENDS_OF_VIEWER: &str = r#"
    SELECT user2_id FROM friendships WHERE user1_id = $1
    UNION
    SELECT user1_id FROM friendships WHERE user2_id = $1
"#;

pub async fn insert_post(
    conn: &mut SqliteConnection,
    author_id: Uuid,
    wall_owner_id: Uuid,
    content: &str,
    date: DateTime<Utc>,
) -> AppResult<Post> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (author_id, wall_owner_id, content, date)
        VALUES ($1, $2, $3, $4)
        RETURNING id, author_id, wall_owner_id, content, date
        "#,
    )
    .bind(author_id)
    .bind(wall_owner_id)
    .bind(content)
    .bind(date)
    .fetch_one(&mut *conn)
    .await?;
    Ok(post)
}

pub async fn find_post(conn: &mut SqliteConnection, post_id: i64) -> AppResult<Option<Post>> {
    let post = sqlx::query_as::<_, Post>(
        "SELECT id, author_id, wall_owner_id, content, date FROM posts WHERE id = $1",
    )
    .bind(post_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(post)
}

pub async fn find_post_row(
    conn: &mut SqliteConnection,
    post_id: i64,
    viewer_id: Uuid,
) -> AppResult<Option<PostRow>> {
    let sql = format!("{} WHERE p.id = $2", POST_ROW_SELECT);
    let row = sqlx::query_as::<_, PostRow>(&sql)
        .bind(viewer_id)
        .bind(post_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row)
}

/// Every post on `wall_owner_id`'s wall, newest first.
pub async fn get_wall_post_rows(
    conn: &mut SqliteConnection,
    wall_owner_id: Uuid,
    viewer_id: Uuid,
) -> AppResult<Vec<PostRow>> {
    let sql = format!(
        "{} WHERE p.wall_owner_id = $2 ORDER BY p.date DESC, p.id DESC",
        POST_ROW_SELECT
    );
    let rows = sqlx::query_as::<_, PostRow>(&sql)
        .bind(viewer_id)
        .bind(wall_owner_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows)
}

/// Posts written by, or on the wall of, any friend of the viewer, newest first.
pub async fn get_feed_post_rows(
    conn: &mut SqliteConnection,
    viewer_id: Uuid,
) -> AppResult<Vec<PostRow>> {
    let sql = format!(
        "{select} WHERE p.author_id IN ({friends}) OR p.wall_owner_id IN ({friends}) \
         ORDER BY p.date DESC, p.id DESC",
        select = POST_ROW_SELECT,
        friends = FRIENDS_OF_VIEWER
    );
    let rows = sqlx::query_as::<_, PostRow>(&sql)
        .bind(viewer_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows)
}

pub async fn update_post_content(
    conn: &mut SqliteConnection,
    post_id: i64,
    content: &str,
) -> AppResult<()> {
    sqlx::query("UPDATE posts SET content = $1 WHERE id = $2")
        .bind(content)
        .bind(post_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Comments and likes go with the post through the foreign keys.
pub async fn delete_post(conn: &mut SqliteConnection, post_id: i64) -> AppResult<()> {
    sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
