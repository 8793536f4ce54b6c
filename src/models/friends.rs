use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Declaration order is also the listing order of a user's requests.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, sqlx::Type,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FriendRequestStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FriendRequest {
    pub id: i64,
    pub from_id: Uuid,
    pub to_id: Uuid,
    pub status: FriendRequestStatus,
    pub created_at: DateTime<Utc>,
}

/// A received request joined with its sender's public columns.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReceivedFriendRequest {
    pub id: i64,
    pub status: FriendRequestStatus,
    pub from_id: Uuid,
    pub from_username: String,
    pub from_name: String,
    pub from_profile_image: Option<String>,
}
