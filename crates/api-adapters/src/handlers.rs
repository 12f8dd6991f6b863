//! # api-adapters Handlers
//!
//! This module coordinates the flow between HTTP requests and the engine.
//! Handlers only translate shapes; every rule lives in `services`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use domains::models::Caller;
use services::BlogEngine;
use uuid::Uuid;

use crate::dto::*;
use crate::error::ApiError;

/// State shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: BlogEngine,
}

type ApiResult<T> = Result<Json<T>, ApiError>;
type Created<T> = Result<(StatusCode, Json<T>), ApiError>;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Created<RegisterResponse> {
    let user = state.engine.register(req.into()).await?;
    Ok((StatusCode::CREATED, Json(RegisterResponse::from(&user))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<SessionResponse> {
    let user = state.engine.login(&req.username, &req.password).await?;
    Ok(Json(SessionResponse::from(&user)))
}

pub async fn logout(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<SessionResponse> {
    let user = state.engine.logout(&username).await?;
    Ok(Json(SessionResponse::from(&user)))
}

pub async fn user_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<ProfileResponse> {
    let profile = state.engine.user_profile(&username).await?;
    Ok(Json(profile.into()))
}

pub async fn user_posts(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Vec<CreatePostResponse>> {
    let posts = state.engine.list_user_posts(&username).await?;
    Ok(Json(posts.iter().map(CreatePostResponse::from).collect()))
}

pub async fn create_post(
    State(state): State<AppState>,
    Json(req): Json<CreatePostRequest>,
) -> Created<CreatePostResponse> {
    let post = state
        .engine
        .create_post(req.title, req.content, &req.username)
        .await?;
    Ok((StatusCode::CREATED, Json(CreatePostResponse::from(&post))))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> ApiResult<PostResponse> {
    let thread = state.engine.get_post(post_id).await?;
    Ok(Json(thread.into()))
}

pub async fn edit_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Json(req): Json<EditPostRequest>,
) -> ApiResult<EditPostResponse> {
    let (username, edit) = req.into_edit();
    let post = state.engine.edit_post(post_id, &username, edit).await?;
    Ok(Json(EditPostResponse::from(&post)))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Json(req): Json<UsernameRequest>,
) -> ApiResult<DeletePostResponse> {
    let summary = state.engine.delete_post(post_id, &req.username).await?;
    Ok(Json(summary.into()))
}

pub async fn view_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    body: Option<Json<ViewPostRequest>>,
) -> ApiResult<ViewPostResponse> {
    // no body at all reads the same as `{}`
    let caller = body
        .map(|Json(req)| Caller::from(req.username))
        .unwrap_or(Caller::Anonymous);
    let view = state.engine.view_post(post_id, &caller).await?;
    Ok(Json(ViewPostResponse::from(&view)))
}

pub async fn comment_on_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Json(req): Json<CommentRequest>,
) -> Created<CommentResponse> {
    let comment = state
        .engine
        .comment_on_post(post_id, req.comment, &req.username)
        .await?;
    Ok((StatusCode::CREATED, Json(CommentResponse::from(&comment))))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path((post_id, comment_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UsernameRequest>,
) -> ApiResult<DeleteCommentResponse> {
    let deleted = state
        .engine
        .delete_comment_in_post(post_id, comment_id, &req.username)
        .await?;
    Ok(Json(deleted.into()))
}

pub async fn health() -> &'static str {
    "ok"
}
