use anyhow::anyhow;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use bcrypt::{hash, verify};
use chrono::Utc;
use serde::Deserialize;
use sqlx::SqliteConnection;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app_state::AppState,
    config::AuthSettings,
    error::{AppError, AppResult},
    handlers::{
        acquire,
        extract::{AppJson, AppPath, AppQuery},
        load_post_views,
    },
    middlewares::auth::bearer_token,
    models::{
        sessions::UserSession,
        users::{NewUser, UserSummary},
    },
    queries::{
        friends::{are_friends, get_friend_ids, get_friends, has_pending_request_between},
        posts::{find_post_row, get_wall_post_rows, insert_post},
        sessions::{
            delete_expired_sessions, delete_session, find_active_session, insert_session,
        },
        users::{find_user_by_username, get_user_by_username, insert_user},
    },
    social::{
        access::can_access_wall,
        pagination::{page_after, PageQuery},
    },
    views::users::{
        friends_by_name, friends_preview, user_details, user_preview, FriendsListView, LoginView,
        Relation,
    },
};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    #[validate(length(
        min = 1,
        max = 50,
        message = "Username must be between 1 and 50 characters long"
    ))]
    username: String,

    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    name: String,

    #[validate(email(message = "Invalid email format"))]
    email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    password: String,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    confirm_password: String,
}

#[derive(Deserialize, Validate)]
pub struct LoginUser {
    #[validate(length(min = 1, message = "Username is required"))]
    username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    password: String,
}

#[derive(Deserialize, Validate)]
pub struct AddPost {
    #[validate(length(min = 1, message = "Content is required"))]
    content: String,
}

/// Register and login are only for clients that are not logged in yet.
/// The caller's session, if any, is left untouched.
async fn ensure_logged_out(conn: &mut SqliteConnection, headers: &HeaderMap) -> AppResult<()> {
    if let Some(token) = bearer_token(headers) {
        if find_active_session(conn, token, Utc::now()).await?.is_some() {
            return Err(AppError::BadRequest(anyhow!("User is already logged in.")));
        }
    }
    Ok(())
}

/// Creates a session for `user_id` and sweeps expired ones.
async fn issue_session(
    conn: &mut SqliteConnection,
    user_id: Uuid,
    username: String,
    settings: &AuthSettings,
) -> AppResult<LoginView> {
    let now = Utc::now();
    let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());

    insert_session(conn, &token, user_id, now + settings.session_ttl).await?;

    let swept = delete_expired_sessions(conn, now).await?;
    if swept > 0 {
        tracing::debug!(swept, "deleted expired sessions");
    }

    Ok(LoginView {
        access_token: token,
        token_type: "bearer",
        expires_in: settings.session_ttl.num_seconds(),
        user_name: username,
    })
}

pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(mut payload): AppJson<RegisterUser>,
) -> AppResult<impl IntoResponse> {
    payload.username = payload.username.trim().to_string();
    payload.name = payload.name.trim().to_string();
    payload.email = payload.email.trim().to_string();

    payload.validate()?;

    let mut conn = acquire(&state).await?;
    ensure_logged_out(&mut conn, &headers).await?;

    let password_hash = hash(payload.password.as_bytes(), state.auth.bcrypt_cost)
        .map_err(|_| AppError::InternalServerError(anyhow!("Error processing registration!")))?;

    let user_id = insert_user(
        &mut conn,
        &NewUser {
            username: &payload.username,
            name: &payload.name,
            email: &payload.email,
            password_hash: &password_hash,
        },
    )
    .await?;

    tracing::info!(%user_id, username = %payload.username, "user registered");

    let login = issue_session(&mut conn, user_id, payload.username, &state.auth).await?;
    Ok((StatusCode::OK, Json(login)))
}

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(mut payload): AppJson<LoginUser>,
) -> AppResult<impl IntoResponse> {
    payload.username = payload.username.trim().to_string();
    payload.validate()?;

    let mut conn = acquire(&state).await?;
    ensure_logged_out(&mut conn, &headers).await?;

    let invalid = || AppError::BadRequest(anyhow!("The user name or password is incorrect."));

    let user = find_user_by_username(&mut conn, &payload.username)
        .await?
        .ok_or_else(invalid)?;

    let matches = verify(payload.password.as_bytes(), &user.password_hash)
        .map_err(|_| AppError::InternalServerError(anyhow!("Error verifying password")))?;
    if !matches {
        tracing::warn!(username = %payload.username, "rejected login");
        return Err(invalid());
    }

    let login = issue_session(&mut conn, user.id, user.username, &state.auth).await?;
    tracing::info!(user_id = %user.id, "user logged in");
    Ok((StatusCode::OK, Json(login)))
}

/// Deletes the caller's session. The token is useless afterwards since every
/// request is checked against the session table.
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state).await?;
    delete_session(&mut conn, &session.token).await?;

    tracing::info!(user_id = %session.user_id, "user logged out");
    Ok(Json(serde_json::json!({"message": "Logout successful."})))
}

async fn relation_to(
    conn: &mut SqliteConnection,
    viewer_id: Uuid,
    target_id: Uuid,
) -> AppResult<Relation> {
    Ok(Relation {
        is_friend: are_friends(conn, viewer_id, target_id).await?,
        has_pending_request: has_pending_request_between(conn, viewer_id, target_id).await?,
    })
}

pub async fn get_user(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    AppPath(username): AppPath<String>,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state).await?;
    let user = get_user_by_username(&mut conn, &username).await?;
    let relation = relation_to(&mut conn, session.user_id, user.id).await?;

    Ok(Json(user_details(user, relation)))
}

pub async fn get_user_preview(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    AppPath(username): AppPath<String>,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state).await?;
    let user = get_user_by_username(&mut conn, &username).await?;
    let relation = relation_to(&mut conn, session.user_id, user.id).await?;

    Ok(Json(user_preview(user, relation)))
}

pub async fn get_wall(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    AppPath(username): AppPath<String>,
    AppQuery(page): AppQuery<PageQuery>,
) -> AppResult<impl IntoResponse> {
    page.validate()?;

    let mut conn = acquire(&state).await?;
    let wall_owner = get_user_by_username(&mut conn, &username).await?;

    let friend_ids = get_friend_ids(&mut conn, session.user_id).await?;
    if !can_access_wall(session.user_id, wall_owner.id, &friend_ids) {
        return Err(AppError::BadRequest(anyhow!("Cannot view non-friend wall.")));
    }

    let candidates = get_wall_post_rows(&mut conn, wall_owner.id, session.user_id).await?;
    let page_rows = page_after(candidates, |row| row.id, &page);
    let posts = load_post_views(&mut conn, page_rows, session.user_id).await?;

    Ok(Json(posts))
}

pub async fn post_on_wall(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    AppPath(username): AppPath<String>,
    AppJson(mut payload): AppJson<AddPost>,
) -> AppResult<impl IntoResponse> {
    payload.content = payload.content.trim().to_string();
    payload.validate()?;

    let mut conn = acquire(&state).await?;
    let wall_owner = get_user_by_username(&mut conn, &username).await?;

    let friend_ids = get_friend_ids(&mut conn, session.user_id).await?;
    if !can_access_wall(session.user_id, wall_owner.id, &friend_ids) {
        return Err(AppError::BadRequest(anyhow!(
            "Only friends can post on user's wall."
        )));
    }

    let post = insert_post(
        &mut conn,
        session.user_id,
        wall_owner.id,
        &payload.content,
        Utc::now(),
    )
    .await?;
    tracing::info!(post_id = post.id, author_id = %session.user_id, wall_owner_id = %wall_owner.id, "post added");

    let row = find_post_row(&mut conn, post.id, session.user_id)
        .await?
        .ok_or_else(|| AppError::InternalServerError(anyhow!("Inserted post disappeared")))?;
    let mut views = load_post_views(&mut conn, vec![row], session.user_id).await?;

    Ok(Json(serde_json::json!({
        "message": "Post successfully added.",
        "post": views.pop(),
    })))
}

/// A user's friends are visible to the user and to their friends.
async fn load_visible_friends(
    state: &AppState,
    viewer_id: Uuid,
    username: &str,
) -> AppResult<Vec<UserSummary>> {
    let mut conn = acquire(state).await?;
    let user = get_user_by_username(&mut conn, username).await?;

    if user.id != viewer_id && !are_friends(&mut conn, viewer_id, user.id).await? {
        return Err(AppError::BadRequest(anyhow!("Cannot access non-friend data.")));
    }

    get_friends(&mut conn, user.id).await
}

pub async fn get_user_friends(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    AppPath(username): AppPath<String>,
) -> AppResult<impl IntoResponse> {
    let friends = load_visible_friends(&state, session.user_id, &username).await?;

    Ok(Json(FriendsListView {
        total_count: friends.len(),
        friends: friends_by_name(friends),
    }))
}

pub async fn get_user_friends_preview(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    AppPath(username): AppPath<String>,
) -> AppResult<impl IntoResponse> {
    let friends = load_visible_friends(&state, session.user_id, &username).await?;
    Ok(Json(friends_preview(friends)))
}
