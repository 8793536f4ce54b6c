pub mod likes;
pub mod posts;
pub mod users;
