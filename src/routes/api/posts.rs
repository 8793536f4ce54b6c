use crate::handlers::api::{comments, posts};
use crate::{app_state::AppState, middlewares::auth::auth_middleware};
use axum::routing::{get, post, put};
use axum::{middleware, Router};

pub fn posts_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/{post_id}",
            get(posts::get_post)
                .put(posts::edit_post)
                .delete(posts::delete_post),
        )
        .route(
            "/{post_id}/likes",
            get(posts::get_post_likes)
                .post(posts::like_post)
                .delete(posts::unlike_post),
        )
        .route("/{post_id}/likes/preview", get(posts::get_post_likes_preview))
        .route("/{post_id}/comments", post(comments::add_comment))
        .route(
            "/{post_id}/comments/{comment_id}",
            put(comments::edit_comment).delete(comments::delete_comment),
        )
        .route(
            "/{post_id}/comments/{comment_id}/likes",
            get(comments::get_comment_likes)
                .post(comments::like_comment)
                .delete(comments::unlike_comment),
        )
        .route(
            "/{post_id}/comments/{comment_id}/likes/preview",
            get(comments::get_comment_likes_preview),
        )
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}
