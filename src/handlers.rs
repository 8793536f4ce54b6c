pub mod api;
pub mod extract;

use anyhow::anyhow;
use sqlx::{pool::PoolConnection, Sqlite, SqliteConnection};
use uuid::Uuid;

use crate::{
    app_state::AppState,
    error::{AppError, AppResult},
    models::posts::PostRow,
    queries::comments::get_latest_comment_rows,
    views::posts::{post_view, PostView, EMBEDDED_COMMENTS},
};

pub(crate) async fn acquire(state: &AppState) -> AppResult<PoolConnection<Sqlite>> {
    state.db_pool.acquire().await.map_err(|e| {
        AppError::InternalServerError(anyhow!("Failed to acquire database connection: {}", e))
    })
}

/// Turns post rows into views, loading each post's newest comments for `viewer_id`.
pub(crate) async fn load_post_views(
    conn: &mut SqliteConnection,
    rows: Vec<PostRow>,
    viewer_id: Uuid,
) -> AppResult<Vec<PostView>> {
    let mut views = Vec::with_capacity(rows.len());
    for row in rows {
        let comments =
            get_latest_comment_rows(conn, row.id, viewer_id, EMBEDDED_COMMENTS as i64).await?;
        views.push(post_view(row, comments));
    }
    Ok(views)
}
