use anyhow::anyhow;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use sqlx::SqliteConnection;

use crate::{
    app_state::AppState,
    config::AuthSettings,
    error::{AppError, AppResult},
    models::sessions::UserSession,
    queries::sessions::{extend_session, find_active_session},
};

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Looks the token up and, when the session is live, pushes its expiry
/// forward by the configured ttl.
pub async fn resolve_session(
    conn: &mut SqliteConnection,
    token: &str,
    settings: &AuthSettings,
) -> AppResult<Option<UserSession>> {
    let now = Utc::now();
    let Some(stored) = find_active_session(conn, token, now).await? else {
        return Ok(None);
    };

    extend_session(conn, &stored.token, now + settings.session_ttl).await?;

    Ok(Some(UserSession {
        user_id: stored.user_id,
        token: stored.token,
    }))
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> AppResult<Response> {
    let Some(token) = bearer_token(req.headers()).map(str::to_owned) else {
        return Err(AppError::Unauthorized(anyhow!("Missing bearer token")));
    };

    let mut conn = state.db_pool.acquire().await.map_err(|e| {
        AppError::InternalServerError(anyhow!("Failed to acquire database connection: {}", e))
    })?;

    match resolve_session(&mut conn, &token, &state.auth).await? {
        Some(user_session) => {
            // release the connection before the handler asks for its own
            drop(conn);
            req.extensions_mut().insert(user_session);
            Ok(next.run(req).await)
        }
        None => Err(AppError::Unauthorized(anyhow!("Invalid session token."))),
    }
}
