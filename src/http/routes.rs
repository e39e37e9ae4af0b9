use axum::{routing::get, routing::post, Router};

use crate::http::handlers;
use crate::AppState;

pub fn health() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health))
}

pub fn auth() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/auth/me", get(handlers::get_current_user))
}

pub fn users() -> Router<AppState> {
    Router::new().route(
        "/users",
        get(handlers::list_users).post(handlers::create_user),
    )
}

pub fn posts() -> Router<AppState> {
    Router::new()
        .route("/posts", get(handlers::list_posts).post(handlers::create_post))
        .route("/posts/:id", get(handlers::get_post))
        .route("/posts/:id/likes", post(handlers::react_to_post))
        .route(
            "/posts/:id/comments",
            get(handlers::list_post_comments).post(handlers::comment_post),
        )
}
