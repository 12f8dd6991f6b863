use std::sync::Arc;

use api_adapters::{router, AppState};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use services::{BlogEngine, Stores};
use storage_adapters::MemoryStore;
use tower::ServiceExt;

async fn app() -> Router {
    let store = Arc::new(MemoryStore::new());
    let engine = BlogEngine::bootstrap(Stores::from_store(store)).await.unwrap();
    router(AppState { engine })
}

async fn send(app: &Router, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn register(app: &Router, username: &str) {
    let (status, body) = send(
        app,
        Method::POST,
        "/users",
        json!({"firstName": "John", "lastName": "Doe", "username": username, "password": "password"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], username);
}

async fn create_post(app: &Router, username: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/posts",
        json!({"username": username, "title": "the prestige", "content": "magician illusion."}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_register_rejects_reserved_username() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/users",
        json!({"firstName": "a", "lastName": "b", "username": "Anonymous", "password": "p"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_locked_user_cannot_post() {
    let app = app().await;
    register(&app, "john123").await;

    let (status, body) = send(&app, Method::DELETE, "/sessions/john123", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["locked"], true);

    let (status, body) = send(
        &app,
        Method::POST,
        "/posts",
        json!({"username": "john123", "title": "t", "content": "c"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "SESSION_LOCKED");

    let (status, _) = send(
        &app,
        Method::POST,
        "/sessions",
        json!({"username": "john123", "password": "password"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    create_post(&app, "john123").await;
}

#[tokio::test]
async fn test_comment_flow_over_http() {
    let app = app().await;
    register(&app, "john123").await;
    register(&app, "jack123").await;
    let post_id = create_post(&app, "john123").await;

    let (status, comment) = send(
        &app,
        Method::POST,
        &format!("/posts/{post_id}/comments"),
        json!({"username": "john123", "comment": "this is amazing"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(comment["commenterUsername"], "john123");
    let comment_id = comment["commentId"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/posts/{post_id}/comments/{comment_id}"),
        json!({"username": "jack123"}),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/posts/{post_id}/comments/{comment_id}"),
        json!({"username": "john123"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["comment"], "this is amazing");
    assert_eq!(body["postId"], post_id.as_str());

    let (status, thread) = send(&app, Method::GET, &format!("/posts/{post_id}"), Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(thread["comments"].as_array().unwrap().len(), 0);
    assert_eq!(thread["views"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_view_without_username_is_anonymous() {
    let app = app().await;
    register(&app, "john123").await;
    let post_id = create_post(&app, "john123").await;

    let (status, view) = send(&app, Method::POST, &format!("/posts/{post_id}/views"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["viewer"], "anonymous");
}

#[tokio::test]
async fn test_edit_by_non_owner_is_not_found() {
    let app = app().await;
    register(&app, "john123").await;
    register(&app, "jack123").await;
    let post_id = create_post(&app, "john123").await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/posts/{post_id}"),
        json!({"username": "jack123", "editedTitle": "stolen"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "POST_NOT_FOUND");

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/posts/{post_id}"),
        json!({"username": "john123", "editedTitle": "inception"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "inception");
    assert_eq!(body["content"], "magician illusion.");
}

#[tokio::test]
async fn test_unknown_post_is_not_found() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::GET,
        "/posts/0190b6a8-7c1e-7c3a-9d4e-2f6a8b9c0d1e",
        Value::Null,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "POST_NOT_FOUND");
}

#[tokio::test]
async fn test_bodyless_view_is_anonymous() {
    let app = app().await;
    register(&app, "john123").await;
    let post_id = create_post(&app, "john123").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("/posts/{post_id}/views"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let view: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(view["viewer"], "anonymous");

    let (_, thread) = send(&app, Method::GET, &format!("/posts/{post_id}"), Value::Null).await;
    assert_eq!(thread["views"].as_array().unwrap().len(), 1);
}
