mod posts;
mod profile;
mod users;
use crate::app_state::AppState;
use axum::Router;

pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/users", users::users_routes(state.clone()))
        .nest("/posts", posts::posts_routes(state.clone()))
        .nest("/me", profile::profile_routes(state))
}
