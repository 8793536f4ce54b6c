use crate::handlers::api::profile;
use crate::{app_state::AppState, middlewares::auth::auth_middleware};
use axum::routing::{get, put};
use axum::{middleware, Router};

pub fn profile_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(profile::get_profile).put(profile::update_profile))
        .route("/ChangePassword", put(profile::change_password))
        .route("/friends", get(profile::get_my_friends))
        .route("/feed", get(profile::get_news_feed))
        .route("/requests", get(profile::get_friend_requests))
        // PUT takes a request id, POST takes the recipient's username
        .route(
            "/requests/{target}",
            put(profile::change_request_status).post(profile::send_friend_request),
        )
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}
