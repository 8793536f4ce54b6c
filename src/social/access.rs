//! Who may interact with a post or a wall.
//!
//! Friendship is symmetric, so "acting user is a friend of X" is checked as
//! "X is in the acting user's friend set".

use std::collections::HashSet;

use uuid::Uuid;

use crate::models::posts::Post;

/// Commenting on a post and liking it (or its comments) is open to the
/// author, the wall owner and the friends of either.
pub fn has_access_to_post(user_id: Uuid, post: &Post, friend_ids: &HashSet<Uuid>) -> bool {
    user_id == post.author_id
        || user_id == post.wall_owner_id
        || friend_ids.contains(&post.wall_owner_id)
        || friend_ids.contains(&post.author_id)
}

/// Reading a wall and writing new posts on it is limited to the owner and
/// the owner's friends.
pub fn can_access_wall(user_id: Uuid, wall_owner_id: Uuid, friend_ids: &HashSet<Uuid>) -> bool {
    user_id == wall_owner_id || friend_ids.contains(&wall_owner_id)
}
