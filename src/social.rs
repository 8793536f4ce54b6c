pub mod access;
pub mod friend_requests;
pub mod likes;
pub mod pagination;
