use serde::Serialize;
use uuid::Uuid;

use crate::models::{
    friends::{FriendRequestStatus, ReceivedFriendRequest},
    users::{User, UserSummary},
};

/// Number of friends listed in a friends preview.
pub const FRIENDS_PREVIEW: usize = 6;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendView {
    pub id: Uuid,
    pub user_name: String,
    pub name: String,
    pub image: Option<String>,
}

impl From<UserSummary> for FriendView {
    fn from(user: UserSummary) -> Self {
        Self {
            id: user.id,
            user_name: user.username,
            name: user.name,
            image: user.profile_image,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendsListView {
    pub total_count: usize,
    pub friends: Vec<FriendView>,
}

/// Full friend list, alphabetical by name.
pub fn friends_by_name(mut friends: Vec<UserSummary>) -> Vec<FriendView> {
    friends.sort_by(|a, b| a.name.cmp(&b.name));
    friends.into_iter().map(FriendView::from).collect()
}

/// `friends` must be most recently added first.
pub fn friends_preview(friends: Vec<UserSummary>) -> FriendsListView {
    FriendsListView {
        total_count: friends.len(),
        friends: friends
            .into_iter()
            .take(FRIENDS_PREVIEW)
            .map(FriendView::from)
            .collect(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailsView {
    pub id: Uuid,
    pub user_name: String,
    pub name: String,
    pub profile_image: Option<String>,
    pub cover_image: Option<String>,
    pub is_friend: bool,
    pub has_pending_request: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreviewView {
    pub id: Uuid,
    pub user_name: String,
    pub name: String,
    pub profile_image: Option<String>,
    pub is_friend: bool,
    pub has_pending_request: bool,
}

/// How the viewing user relates to the user being looked at.
#[derive(Debug, Clone, Copy, Default)]
pub struct Relation {
    pub is_friend: bool,
    pub has_pending_request: bool,
}

pub fn user_details(user: User, relation: Relation) -> UserDetailsView {
    UserDetailsView {
        id: user.id,
        user_name: user.username,
        name: user.name,
        profile_image: user.profile_image,
        cover_image: user.cover_image,
        is_friend: relation.is_friend,
        has_pending_request: relation.has_pending_request,
    }
}

pub fn user_preview(user: User, relation: Relation) -> UserPreviewView {
    UserPreviewView {
        id: user.id,
        user_name: user.username,
        name: user.name,
        profile_image: user.profile_image_minified,
        is_friend: relation.is_friend,
        has_pending_request: relation.has_pending_request,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub user_name: String,
    pub name: String,
    pub gender: &'static str,
    pub email: String,
    pub phone_number: Option<String>,
    pub image: Option<String>,
    pub friends_count: i64,
}

pub fn profile(user: User, friends_count: i64) -> ProfileView {
    ProfileView {
        user_name: user.username,
        name: user.name,
        gender: user.gender.as_str(),
        email: user.email,
        phone_number: user.phone_number,
        image: user.profile_image,
        friends_count,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestView {
    pub id: i64,
    pub status: FriendRequestStatus,
    pub user: FriendView,
}

/// Pending requests first, then approved, then rejected; arrival order is
/// kept within each status.
pub fn friend_requests(mut requests: Vec<ReceivedFriendRequest>) -> Vec<FriendRequestView> {
    requests.sort_by_key(|r| r.status);
    requests
        .into_iter()
        .map(|r| FriendRequestView {
            id: r.id,
            status: r.status,
            user: FriendView {
                id: r.from_id,
                user_name: r.from_username,
                name: r.from_name,
                image: r.from_profile_image,
            },
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct LoginView {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    #[serde(rename = "userName")]
    pub user_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str) -> UserSummary {
        UserSummary {
            id: Uuid::new_v4(),
            username: name.to_lowercase(),
            name: name.to_string(),
            profile_image: None,
            profile_image_minified: None,
        }
    }

    #[test]
    fn preview_takes_six_and_reports_total() {
        let friends: Vec<_> = ["Ann", "Bob", "Cid", "Dan", "Eve", "Fay", "Gus", "Hal"]
            .into_iter()
            .map(summary)
            .collect();
        let preview = friends_preview(friends);
        assert_eq!(preview.total_count, 8);
        assert_eq!(preview.friends.len(), FRIENDS_PREVIEW);
        assert_eq!(preview.friends[0].name, "Ann");
    }

    #[test]
    fn full_list_is_sorted_by_name() {
        let friends = vec![summary("Mary"), summary("Alice"), summary("John")];
        let names: Vec<_> = friends_by_name(friends).into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["Alice", "John", "Mary"]);
    }

    #[test]
    fn requests_are_grouped_by_status_stably() {
        let request = |id, status| ReceivedFriendRequest {
            id,
            status,
            from_id: Uuid::new_v4(),
            from_username: format!("u{}", id),
            from_name: format!("U{}", id),
            from_profile_image: None,
        };
        let views = friend_requests(vec![
            request(1, FriendRequestStatus::Rejected),
            request(2, FriendRequestStatus::Pending),
            request(3, FriendRequestStatus::Approved),
            request(4, FriendRequestStatus::Pending),
        ]);
        let ids: Vec<i64> = views.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![2, 4, 3, 1]);
    }
}
