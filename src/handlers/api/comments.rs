use anyhow::anyhow;
use axum::{
    extract::State,
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use sqlx::SqliteConnection;
use validator::Validate;

use crate::{
    app_state::AppState,
    error::{AppError, AppResult},
    handlers::{
        acquire,
        api::posts::{ensure_post_access, get_existing_post},
        extract::{AppJson, AppPath},
    },
    models::{
        likes::LikeTarget,
        posts::{Comment, Post},
        sessions::UserSession,
    },
    queries::{
        comments::{
            delete_comment as delete_comment_by_id, find_comment, insert_comment,
            update_comment_content,
        },
        likes::get_likes,
    },
    social::likes,
    views::{
        likes::{detailed_likes, like_toggled, likes_preview},
        posts::{CreatedCommentView, EditedContentView},
    },
};

#[derive(Deserialize, Validate)]
pub struct CommentContent {
    #[validate(length(min = 2, message = "Content must be at least 2 characters long"))]
    pub content: String,
}

/// Loads the post and one of its comments. A comment that belongs to a
/// different post is treated as missing.
async fn get_post_and_comment(
    conn: &mut SqliteConnection,
    post_id: i64,
    comment_id: i64,
) -> AppResult<(Post, Comment)> {
    let post = get_existing_post(conn, post_id).await?;
    let comment = find_comment(conn, comment_id)
        .await?
        .filter(|comment| comment.post_id == post.id)
        .ok_or_else(|| AppError::NotFound(anyhow!("Comment {} not found", comment_id)))?;
    Ok((post, comment))
}

pub async fn add_comment(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    AppPath(post_id): AppPath<i64>,
    AppJson(mut payload): AppJson<CommentContent>,
) -> AppResult<impl IntoResponse> {
    payload.content = payload.content.trim().to_string();
    payload.validate()?;

    let mut conn = acquire(&state).await?;
    let post = get_existing_post(&mut conn, post_id).await?;
    ensure_post_access(
        &mut conn,
        session.user_id,
        &post,
        "Post must be by friend or on friend's wall.",
    )
    .await?;

    let comment = insert_comment(
        &mut conn,
        post.id,
        session.user_id,
        &payload.content,
        Utc::now(),
    )
    .await?;

    Ok(Json(CreatedCommentView::from(comment)))
}

pub async fn edit_comment(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    AppPath((post_id, comment_id)): AppPath<(i64, i64)>,
    AppJson(mut payload): AppJson<CommentContent>,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state).await?;
    let (_, comment) = get_post_and_comment(&mut conn, post_id, comment_id).await?;

    if comment.author_id != session.user_id {
        return Err(AppError::BadRequest(anyhow!("Not comment author.")));
    }

    payload.content = payload.content.trim().to_string();
    payload.validate()?;

    update_comment_content(&mut conn, comment.id, &payload.content).await?;

    Ok(Json(EditedContentView {
        id: comment.id,
        content: payload.content,
    }))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    AppPath((post_id, comment_id)): AppPath<(i64, i64)>,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state).await?;
    let (post, comment) = get_post_and_comment(&mut conn, post_id, comment_id).await?;

    if comment.author_id != session.user_id && post.author_id != session.user_id {
        return Err(AppError::BadRequest(anyhow!(
            "Not comment author/post owner."
        )));
    }

    delete_comment_by_id(&mut conn, comment.id).await?;

    Ok(Json(
        serde_json::json!({"message": "Comment successfully deleted."}),
    ))
}

pub async fn get_comment_likes(
    State(state): State<AppState>,
    AppPath((post_id, comment_id)): AppPath<(i64, i64)>,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state).await?;
    let (_, comment) = get_post_and_comment(&mut conn, post_id, comment_id).await?;

    let target = LikeTarget::Comment(comment.id);
    let likes = get_likes(&mut conn, target).await?;
    Ok(Json(detailed_likes(target, likes)))
}

pub async fn get_comment_likes_preview(
    State(state): State<AppState>,
    AppPath((post_id, comment_id)): AppPath<(i64, i64)>,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state).await?;
    let (_, comment) = get_post_and_comment(&mut conn, post_id, comment_id).await?;

    let target = LikeTarget::Comment(comment.id);
    let likes = get_likes(&mut conn, target).await?;
    Ok(Json(likes_preview(target, likes)))
}

pub async fn like_comment(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    AppPath((post_id, comment_id)): AppPath<(i64, i64)>,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state).await?;
    let (post, comment) = get_post_and_comment(&mut conn, post_id, comment_id).await?;
    ensure_post_access(&mut conn, session.user_id, &post, "Cannot like this comment.").await?;

    let target = LikeTarget::Comment(comment.id);
    let likes_count = likes::like(&mut conn, target, session.user_id).await?;
    Ok(Json(like_toggled(target, likes_count, true)))
}

pub async fn unlike_comment(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    AppPath((post_id, comment_id)): AppPath<(i64, i64)>,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state).await?;
    let (post, comment) = get_post_and_comment(&mut conn, post_id, comment_id).await?;
    ensure_post_access(&mut conn, session.user_id, &post, "Cannot unlike this comment.").await?;

    let target = LikeTarget::Comment(comment.id);
    let likes_count = likes::unlike(&mut conn, target, session.user_id).await?;
    Ok(Json(like_toggled(target, likes_count, false)))
}
