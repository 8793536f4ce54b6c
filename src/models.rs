pub mod friends;
pub mod likes;
pub mod posts;
pub mod sessions;
pub mod users;
