use crate::config::AuthSettings;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: sqlx::SqlitePool,
    pub auth: AuthSettings,
}
