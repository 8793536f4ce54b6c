//! Like and unlike. Liking twice or unliking something never liked is a
//! client error; both return the target's fresh like count.

use anyhow::anyhow;
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::likes::LikeTarget,
    queries::likes::{count_likes, delete_like, has_liked, insert_like},
};

fn noun(target: LikeTarget) -> &'static str {
    match target {
        LikeTarget::Post(_) => "Post",
        LikeTarget::Comment(_) => "Comment",
    }
}

pub async fn like(conn: &mut SqliteConnection, target: LikeTarget, user_id: Uuid) -> AppResult<i64> {
    if has_liked(conn, target, user_id).await? {
        return Err(AppError::BadRequest(anyhow!(
            "{} is already liked.",
            noun(target)
        )));
    }

    insert_like(conn, target, user_id).await?;
    tracing::debug!(?target, %user_id, "like added");
    count_likes(conn, target).await
}

pub async fn unlike(
    conn: &mut SqliteConnection,
    target: LikeTarget,
    user_id: Uuid,
) -> AppResult<i64> {
    if !delete_like(conn, target, user_id).await? {
        return Err(AppError::BadRequest(anyhow!("{} has no like.", noun(target))));
    }

    tracing::debug!(?target, %user_id, "like removed");
    count_likes(conn, target).await
}
