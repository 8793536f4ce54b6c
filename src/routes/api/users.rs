use crate::handlers::api::users;
use crate::{app_state::AppState, middlewares::auth::auth_middleware};
use axum::routing::{get, post};
use axum::{middleware, Router};

pub fn users_routes(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected = Router::new()
        .route("/Logout", post(users::logout))
        .route("/{username}", get(users::get_user))
        .route("/{username}/preview", get(users::get_user_preview))
        .route(
            "/{username}/wall",
            get(users::get_wall).post(users::post_on_wall),
        )
        .route("/{username}/friends", get(users::get_user_friends))
        .route(
            "/{username}/friends/preview",
            get(users::get_user_friends_preview),
        )
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/Register", post(users::register)) // /api/users/Register
        .route("/Login", post(users::login))
        .merge(protected)
}
