use anyhow::anyhow;
use axum::{
    extract::State,
    response::IntoResponse,
    Extension, Json,
};
use bcrypt::{hash, verify};
use serde::Deserialize;
use sqlx::Acquire;
use validator::Validate;

use crate::{
    app_state::AppState,
    error::{AppError, AppResult},
    handlers::{
        acquire,
        extract::{AppJson, AppPath, AppQuery},
        load_post_views,
    },
    models::{
        friends::FriendRequestStatus,
        sessions::UserSession,
        users::{Gender, ProfileUpdate},
    },
    queries::{
        friends::{
            are_friends, count_friends, find_friend_request, get_friends,
            get_received_friend_requests, has_pending_request_between, insert_friend_request,
            insert_new_friendship, update_friend_request_status_with_id,
        },
        posts::get_feed_post_rows,
        users::{
            find_user_id_by_email, get_user_by_id, get_user_by_username, update_password_hash,
            update_user_profile_by_id,
        },
    },
    social::{
        friend_requests::{ensure_can_send, resolve, ExistingRelation},
        pagination::{page_after, PageQuery},
    },
    utils::images::{ensure_image_size, COVER_IMAGE_KB_LIMIT, PROFILE_IMAGE_KB_LIMIT},
    views::users::{friend_requests, friends_by_name, profile},
};

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state).await?;
    let user = get_user_by_id(&mut conn, session.user_id).await?;
    let friends_count = count_friends(&mut conn, user.id).await?;

    Ok(Json(profile(user, friends_count)))
}

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateData {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters long"
    ))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub phone_number: Option<String>,
    #[serde(default)]
    pub gender: Gender,
    pub profile_image_data: Option<String>,
    pub cover_image_data: Option<String>,
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    AppJson(mut profile_data): AppJson<ProfileUpdateData>,
) -> AppResult<impl IntoResponse> {
    profile_data.name = profile_data.name.trim().to_string();
    profile_data.email = profile_data.email.trim().to_string();
    if let Some(phone_number) = &mut profile_data.phone_number {
        *phone_number = phone_number.trim().to_string();
    }

    profile_data.validate()?;

    let mut conn = acquire(&state).await?;

    if let Some(holder_id) = find_user_id_by_email(&mut conn, &profile_data.email).await? {
        if holder_id != session.user_id {
            return Err(AppError::BadRequest(anyhow!("Email is already taken.")));
        }
    }

    ensure_image_size(
        profile_data.profile_image_data.as_deref(),
        PROFILE_IMAGE_KB_LIMIT,
        "Profile",
    )?;
    ensure_image_size(
        profile_data.cover_image_data.as_deref(),
        COVER_IMAGE_KB_LIMIT,
        "Cover",
    )?;

    update_user_profile_by_id(
        &mut conn,
        session.user_id,
        &ProfileUpdate {
            name: &profile_data.name,
            email: &profile_data.email,
            phone_number: profile_data.phone_number.as_deref(),
            gender: profile_data.gender,
            profile_image: profile_data.profile_image_data.as_deref(),
            cover_image: profile_data.cover_image_data.as_deref(),
        },
    )
    .await?;

    Ok(Json(
        serde_json::json!({"message": "User profile edited successfully."}),
    ))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordData {
    #[validate(length(min = 1, message = "Old password is required"))]
    old_password: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    new_password: String,
    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    confirm_password: String,
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    AppJson(payload): AppJson<ChangePasswordData>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;

    let mut conn = acquire(&state).await?;
    let user = get_user_by_id(&mut conn, session.user_id).await?;

    if user.username == "admin" {
        return Err(AppError::BadRequest(anyhow!(
            "Password change for user 'admin' is not allowed!"
        )));
    }

    let matches = verify(payload.old_password.as_bytes(), &user.password_hash)
        .map_err(|_| AppError::InternalServerError(anyhow!("Error verifying password")))?;
    if !matches {
        return Err(AppError::BadRequest(anyhow!("Incorrect password.")));
    }

    let password_hash = hash(payload.new_password.as_bytes(), state.auth.bcrypt_cost)
        .map_err(|_| AppError::InternalServerError(anyhow!("Error processing password change!")))?;
    update_password_hash(&mut conn, user.id, &password_hash).await?;

    tracing::info!(user_id = %user.id, "password changed");
    Ok(Json(
        serde_json::json!({"message": "Password successfully changed."}),
    ))
}

pub async fn get_my_friends(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state).await?;
    let friends = get_friends(&mut conn, session.user_id).await?;

    Ok(Json(friends_by_name(friends)))
}

pub async fn get_news_feed(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    AppQuery(page): AppQuery<PageQuery>,
) -> AppResult<impl IntoResponse> {
    page.validate()?;

    let mut conn = acquire(&state).await?;
    let candidates = get_feed_post_rows(&mut conn, session.user_id).await?;
    let page_rows = page_after(candidates, |row| row.id, &page);
    let posts = load_post_views(&mut conn, page_rows, session.user_id).await?;

    Ok(Json(posts))
}

pub async fn get_friend_requests(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state).await?;
    let requests = get_received_friend_requests(&mut conn, session.user_id).await?;

    Ok(Json(friend_requests(requests)))
}

#[derive(Deserialize)]
pub struct RequestStatusQuery {
    pub status: String,
}

pub async fn change_request_status(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    AppPath(request_id): AppPath<i64>,
    AppQuery(query): AppQuery<RequestStatusQuery>,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state).await?;

    // Start a transaction
    let mut tx = conn.begin().await.map_err(|e| {
        AppError::InternalServerError(anyhow!("Database transaction failed: {}", e))
    })?;

    let request = find_friend_request(&mut tx, request_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow!("Friend request not found")))?;

    let new_status = resolve(&request, session.user_id, query.status.trim())?;

    update_friend_request_status_with_id(&mut tx, request.id, new_status).await?;
    if new_status == FriendRequestStatus::Approved {
        insert_new_friendship(&mut tx, request.from_id, request.to_id).await?;
    }

    tx.commit().await.map_err(|e| {
        AppError::InternalServerError(anyhow!("Failed to commit transaction: {}", e))
    })?;

    tracing::info!(request_id, status = ?new_status, "friend request resolved");
    Ok(Json(serde_json::json!({
        "message": format!("Friend request successfully {}.", query.status.trim()),
    })))
}

pub async fn send_friend_request(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    AppPath(username): AppPath<String>,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state).await?;
    let recipient = get_user_by_username(&mut conn, &username).await?;

    let relation = ExistingRelation {
        already_friends: are_friends(&mut conn, session.user_id, recipient.id).await?,
        pending_request: has_pending_request_between(&mut conn, session.user_id, recipient.id)
            .await?,
    };
    ensure_can_send(session.user_id, recipient.id, relation)?;

    let request_id = insert_friend_request(&mut conn, session.user_id, recipient.id).await?;

    tracing::info!(request_id, from = %session.user_id, to = %recipient.id, "friend request sent");
    Ok(Json(serde_json::json!({ "id": request_id })))
}
