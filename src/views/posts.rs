use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::posts::{Comment, CommentRow, PostRow};

/// Number of comments embedded in a post view.
pub const EMBEDDED_COMMENTS: usize = 3;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
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
    pub comments: Vec<CommentView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: i64,
    pub author_id: Uuid,
    pub author_username: String,
    pub author_profile_image: Option<String>,
    pub likes_count: i64,
    pub comment_content: String,
    pub date: DateTime<Utc>,
    pub liked: bool,
}

impl From<CommentRow> for CommentView {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            author_id: row.author_id,
            author_username: row.author_username,
            author_profile_image: row.author_profile_image,
            likes_count: row.likes_count,
            comment_content: row.content,
            date: row.date,
            liked: row.liked,
        }
    }
}

/// Builds a post view from its row and its comments in display order
/// (newest first); only the first few comments are embedded.
pub fn post_view(row: PostRow, comments: Vec<CommentRow>) -> PostView {
    PostView {
        id: row.id,
        author_id: row.author_id,
        author_username: row.author_username,
        author_profile_image: row.author_profile_image,
        wall_owner_id: row.wall_owner_id,
        content: row.content,
        date: row.date,
        likes_count: row.likes_count,
        liked: row.liked,
        total_comments_count: row.total_comments_count,
        comments: comments
            .into_iter()
            .take(EMBEDDED_COMMENTS)
            .map(CommentView::from)
            .collect(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditedContentView {
    pub id: i64,
    pub content: String,
}

/// Response of the create-comment endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedCommentView {
    pub id: i64,
    pub author_id: Uuid,
    pub post_id: i64,
    pub likes: i64,
    pub content: String,
    pub date: DateTime<Utc>,
}

impl From<Comment> for CreatedCommentView {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            author_id: comment.author_id,
            post_id: comment.post_id,
            likes: 0,
            content: comment.content,
            date: comment.date,
        }
    }
}
