use uuid::Uuid;

/// The thing being liked. Post and comment likes live in separate tables
/// with the same shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget {
    Post(i64),
    Comment(i64),
}

impl LikeTarget {
    pub fn id(&self) -> i64 {
        match self {
            LikeTarget::Post(id) | LikeTarget::Comment(id) => *id,
        }
    }

    pub(crate) fn table(&self) -> &'static str {
        match self {
            LikeTarget::Post(_) => "post_likes",
            LikeTarget::Comment(_) => "comment_likes",
        }
    }

    pub(crate) fn column(&self) -> &'static str {
        match self {
            LikeTarget::Post(_) => "post_id",
            LikeTarget::Comment(_) => "comment_id",
        }
    }
}

/// One like, joined with the liking user.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LikeRow {
    pub target_id: i64,
    pub user_id: Uuid,
    pub username: String,
    pub name: String,
    pub profile_image: Option<String>,
}
