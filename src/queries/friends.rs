use std::collections::HashSet;

use chrono::Utc;
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        friends::{FriendRequest, FriendRequestStatus, ReceivedFriendRequest},
        users::UserSummary,
    },
};

/// Ids of everyone `user_id` is friends with.
pub async fn get_friend_ids(conn: &mut SqliteConnection, user_id: Uuid) -> AppResult<HashSet<Uuid>> {
    let ids: Vec<Uuid> = sqlx::query_scalar(
        r#"
        SELECT user2_id FROM friendships WHERE user1_id = $1
        UNION
        SELECT user1_id FROM friendships WHERE user2_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(ids.into_iter().collect())
}

pub async fn are_friends(conn: &mut SqliteConnection, a: Uuid, b: Uuid) -> AppResult<bool> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM friendships WHERE user1_id = $1 AND user2_id = $2)",
    )
    .bind(std::cmp::min(a, b))
    .bind(std::cmp::max(a, b))
    .fetch_one(&mut *conn)
    .await?;
    Ok(exists)
}

/// Friends of `user_id`, most recently added first.
pub async fn get_friends(conn: &mut SqliteConnection, user_id: Uuid) -> AppResult<Vec<UserSummary>> {
    let friends = sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT u.id, u.username, u.name, u.profile_image, u.profile_image_minified
        FROM friendships f
        JOIN users u ON u.id = CASE WHEN f.user1_id = $1 THEN f.user2_id ELSE f.user1_id END
        WHERE f.user1_id = $1 OR f.user2_id = $1
        ORDER BY f.id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(friends)
}

pub async fn count_friends(conn: &mut SqliteConnection, user_id: Uuid) -> AppResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM friendships WHERE user1_id = $1 OR user2_id = $1",
    )
    .bind(user_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(count)
}

pub async fn insert_new_friendship(
    conn: &mut SqliteConnection,
    user1_id: Uuid,
    user2_id: Uuid,
) -> AppResult<()> {
    sqlx::query("INSERT INTO friendships (user1_id, user2_id, created_at) VALUES ($1, $2, $3)")
        // one row per unordered pair, smaller id first
        .bind(std::cmp::min(user1_id, user2_id))
        .bind(std::cmp::max(user1_id, user2_id))
        .bind(Utc::now())
        .execute(&mut *conn)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => {
                AppError::BadRequest(anyhow::anyhow!("Friendship already exists"))
            }
            _ => AppError::InternalServerError(anyhow::anyhow!(
                "Failed to create friendship: {}",
                e
            )),
        })?;

    Ok(())
}

pub async fn insert_friend_request(
    conn: &mut SqliteConnection,
    from_id: Uuid,
    to_id: Uuid,
) -> AppResult<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO friend_requests (from_id, to_id, status, created_at) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(from_id)
    .bind(to_id)
    .bind(FriendRequestStatus::Pending)
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| match e.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => {
            AppError::BadRequest(anyhow::anyhow!("A pending request already exists."))
        }
        _ => AppError::InternalServerError(anyhow::anyhow!(
            "Failed to send friend request: {}",
            e
        )),
    })?;

    Ok(id)
}

pub async fn find_friend_request(
    conn: &mut SqliteConnection,
    request_id: i64,
) -> AppResult<Option<FriendRequest>> {
    let request = sqlx::query_as::<_, FriendRequest>(
        "SELECT id, from_id, to_id, status, created_at FROM friend_requests WHERE id = $1",
    )
    .bind(request_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(request)
}

/// True when a pending request exists from `a` to `b` or from `b` to `a`.
pub async fn has_pending_request_between(
    conn: &mut SqliteConnection,
    a: Uuid,
    b: Uuid,
) -> AppResult<bool> {
    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM friend_requests
            WHERE status = $3
              AND ((from_id = $1 AND to_id = $2) OR (from_id = $2 AND to_id = $1))
        )
        "#,
    )
    .bind(a)
    .bind(b)
    .bind(FriendRequestStatus::Pending)
    .fetch_one(&mut *conn)
    .await?;
    Ok(exists)
}

pub async fn update_friend_request_status_with_id(
    conn: &mut SqliteConnection,
    request_id: i64,
    status: FriendRequestStatus,
) -> AppResult<()> {
    sqlx::query("UPDATE friend_requests SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(request_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            AppError::InternalServerError(anyhow::anyhow!(
                "Failed to update friend request status: {}",
                e
            ))
        })?;

    Ok(())
}

/// Requests addressed to `user_id`, in insertion order.
pub async fn get_received_friend_requests(
    conn: &mut SqliteConnection,
    user_id: Uuid,
) -> AppResult<Vec<ReceivedFriendRequest>> {
    let requests = sqlx::query_as::<_, ReceivedFriendRequest>(
        r#"
        SELECT r.id, r.status, u.id AS from_id, u.username AS from_username,
               u.name AS from_name, u.profile_image AS from_profile_image
        FROM friend_requests r
        JOIN users u ON u.id = r.from_id
        WHERE r.to_id = $1
        ORDER BY r.id
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(requests)
}
