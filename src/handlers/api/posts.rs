use anyhow::anyhow;
use axum::{
    extract::State,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use sqlx::SqliteConnection;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app_state::AppState,
    error::{AppError, AppResult},
    handlers::{
        acquire,
        extract::{AppJson, AppPath},
        load_post_views,
    },
    models::{likes::LikeTarget, posts::Post, sessions::UserSession},
    queries::{
        friends::get_friend_ids,
        likes::get_likes,
        posts::{delete_post as delete_post_by_id, find_post, find_post_row, update_post_content},
    },
    social::{access::has_access_to_post, likes},
    views::{
        likes::{detailed_likes, like_toggled, likes_preview},
        posts::EditedContentView,
    },
};

#[derive(Deserialize, Validate)]
pub struct EditPost {
    #[validate(length(min = 2, message = "Content must be at least 2 characters long"))]
    pub content: String,
}

pub(crate) async fn get_existing_post(conn: &mut SqliteConnection, post_id: i64) -> AppResult<Post> {
    find_post(conn, post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow!("Post {} not found", post_id)))
}

/// Rejects users who may not comment on or like `post`.
pub(crate) async fn ensure_post_access(
    conn: &mut SqliteConnection,
    user_id: Uuid,
    post: &Post,
    message: &'static str,
) -> AppResult<()> {
    let friend_ids = get_friend_ids(conn, user_id).await?;
    if !has_access_to_post(user_id, post, &friend_ids) {
        return Err(AppError::BadRequest(anyhow!(message)));
    }
    Ok(())
}

pub async fn get_post(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    AppPath(post_id): AppPath<i64>,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state).await?;
    let row = find_post_row(&mut conn, post_id, session.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow!("Post {} not found", post_id)))?;

    let mut views = load_post_views(&mut conn, vec![row], session.user_id).await?;
    Ok(Json(views.pop()))
}

pub async fn edit_post(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    AppPath(post_id): AppPath<i64>,
    AppJson(mut payload): AppJson<EditPost>,
) -> AppResult<impl IntoResponse> {
    payload.content = payload.content.trim().to_string();
    payload.validate()?;

    let mut conn = acquire(&state).await?;
    let post = get_existing_post(&mut conn, post_id).await?;

    if post.author_id != session.user_id {
        return Err(AppError::BadRequest(anyhow!("Not post author.")));
    }

    update_post_content(&mut conn, post.id, &payload.content).await?;

    Ok(Json(EditedContentView {
        id: post.id,
        content: payload.content,
    }))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    AppPath(post_id): AppPath<i64>,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state).await?;
    let post = get_existing_post(&mut conn, post_id).await?;

    if post.author_id != session.user_id && post.wall_owner_id != session.user_id {
        return Err(AppError::BadRequest(anyhow!("Not post author/wall owner.")));
    }

    delete_post_by_id(&mut conn, post.id).await?;
    tracing::info!(post_id, user_id = %session.user_id, "post deleted");

    Ok(Json(serde_json::json!({"message": "Post successfully deleted."})))
}

pub async fn get_post_likes(
    State(state): State<AppState>,
    AppPath(post_id): AppPath<i64>,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state).await?;
    let post = get_existing_post(&mut conn, post_id).await?;

    let target = LikeTarget::Post(post.id);
    let likes = get_likes(&mut conn, target).await?;
    Ok(Json(detailed_likes(target, likes)))
}

pub async fn get_post_likes_preview(
    State(state): State<AppState>,
    AppPath(post_id): AppPath<i64>,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state).await?;
    let post = get_existing_post(&mut conn, post_id).await?;

    let target = LikeTarget::Post(post.id);
    let likes = get_likes(&mut conn, target).await?;
    Ok(Json(likes_preview(target, likes)))
}

pub async fn like_post(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    AppPath(post_id): AppPath<i64>,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state).await?;
    let post = get_existing_post(&mut conn, post_id).await?;
    ensure_post_access(&mut conn, session.user_id, &post, "Cannot like this post.").await?;

    let target = LikeTarget::Post(post.id);
    let likes_count = likes::like(&mut conn, target, session.user_id).await?;
    Ok(Json(like_toggled(target, likes_count, true)))
}

pub async fn unlike_post(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    AppPath(post_id): AppPath<i64>,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state).await?;
    let post = get_existing_post(&mut conn, post_id).await?;
    ensure_post_access(&mut conn, session.user_id, &post, "Cannot unlike this post.").await?;

    let target = LikeTarget::Post(post.id);
    let likes_count = likes::unlike(&mut conn, target, session.user_id).await?;
    Ok(Json(like_toggled(target, likes_count, false)))
}
