use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Identity attached to a request once its bearer token resolved to a live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoredSession {
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}
