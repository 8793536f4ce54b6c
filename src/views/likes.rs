use serde_json::{json, Value};

use crate::models::likes::{LikeRow, LikeTarget};

/// Number of likes listed in a like preview.
pub const LIKES_PREVIEW: usize = 10;

fn id_key(target: LikeTarget) -> &'static str {
    match target {
        LikeTarget::Post(_) => "postId",
        LikeTarget::Comment(_) => "commentId",
    }
}

/// Every like with the liking user's name and image.
pub fn detailed_likes(target: LikeTarget, likes: Vec<LikeRow>) -> Value {
    let id_key = id_key(target);
    Value::Array(
        likes
            .into_iter()
            .map(|like| {
                json!({
                    "userId": like.user_id,
                    "name": like.name,
                    "username": like.username,
                    "profileImage": like.profile_image,
                    id_key: like.target_id,
                })
            })
            .collect(),
    )
}

/// The first few likes plus the total count; the list is shorter than the
/// total whenever there are more than [`LIKES_PREVIEW`] likes.
pub fn likes_preview(target: LikeTarget, likes: Vec<LikeRow>) -> Value {
    let id_key = id_key(target);
    let list_key = match target {
        LikeTarget::Post(_) => "postLikes",
        LikeTarget::Comment(_) => "commentLikes",
    };
    let total_like_count = likes.len();
    let preview: Vec<Value> = likes
        .into_iter()
        .take(LIKES_PREVIEW)
        .map(|like| json!({ "userId": like.user_id, id_key: like.target_id }))
        .collect();

    json!({
        "totalLikeCount": total_like_count,
        list_key: preview,
    })
}

/// Response of like and unlike.
pub fn like_toggled(target: LikeTarget, likes_count: i64, liked: bool) -> Value {
    json!({
        id_key(target): target.id(),
        "likesCount": likes_count,
        "liked": liked,
    })
}
