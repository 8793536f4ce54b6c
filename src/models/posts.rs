use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub author_id: Uuid,
    pub wall_owner_id: Uuid,
    pub content: String,
    pub date: DateTime<Utc>,
}

/// A post with its author columns and the aggregates a post view needs,
/// computed for one viewing user.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    pub id: i64,
    pub author_id: Uuid,
    pub author_username: String,
    pub author_profile_image: Option<String>,
    pub wall_owner_id: Uuid,
    pub content: String,
    pub date: DateTime<Utc>,
    pub likes_count: i64,
    pub liked: bool,
    pub total_comments_count: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: Uuid,
    pub content: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRow {
    pub id: i64,
    pub author_id: Uuid,
    pub author_username: String,
    pub author_profile_image: Option<String>,
    pub content: String,
    pub date: DateTime<Utc>,
    pub likes_count: i64,
    pub liked: bool,
}
