//! # api-adapters
//!
//! The web routing and shape-translation layer for Rusty-Blog.
//! The caller's identity is read from the request body; handlers perform no
//! authentication of their own.

pub mod dto;
#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod middleware;

#[cfg(feature = "web-axum")]
pub use handlers::AppState;

/// Builds the blog routes with middleware attached.
///
/// # Developer Note
/// The router is returned without a listener so the binary can mount it
/// under a different prefix if needed (e.g., /api/v1/).
#[cfg(feature = "web-axum")]
pub fn router(state: AppState) -> axum::Router {
    use axum::routing::{delete, get, post};

    axum::Router::new()
        .route("/health", get(handlers::health))
        .route("/users", post(handlers::register))
        .route("/users/{username}", get(handlers::user_profile))
        .route("/users/{username}/posts", get(handlers::user_posts))
        .route("/sessions", post(handlers::login))
        .route("/sessions/{username}", delete(handlers::logout))
        .route("/posts", post(handlers::create_post))
        .route(
            "/posts/{post_id}",
            get(handlers::get_post)
                .patch(handlers::edit_post)
                .delete(handlers::delete_post),
        )
        .route("/posts/{post_id}/views", post(handlers::view_post))
        .route("/posts/{post_id}/comments", post(handlers::comment_on_post))
        .route(
            "/posts/{post_id}/comments/{comment_id}",
            delete(handlers::delete_comment),
        )
        .layer(middleware::cors_policy())
        .layer(middleware::propagate_request_id())
        .layer(middleware::trace_layer())
        .layer(middleware::set_request_id())
        .with_state(state)
}
