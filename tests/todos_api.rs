//! Router tests for the REST endpoints, run against the in-memory
//! datastore backend.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;
use tudu::datastore::memory::MemoryTodos;
use tudu::libs::todo::{Envelope, Todo};
use tudu::server::{router, AppState};

fn test_app() -> axum::Router {
    let store = Arc::new(MemoryTodos::new());
    router(AppState::new(store, "http://localhost:3000"))
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn create_assigns_id_and_defaults_completed() {
    let app = test_app();

    let response = app
        .oneshot(json_request("POST", "/api/todos", r#"{"text":"Buy milk"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Todo = body_json(response).await;
    assert_eq!(created.id, 1);
    assert_eq!(created.text, "Buy milk");
    assert!(!created.completed);
}

#[tokio::test]
async fn create_with_empty_text_is_rejected() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/todos", r#"{"text":"  "}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // No record was created.
    let response = app.oneshot(get_request("/api/todos")).await.unwrap();
    let todos: Vec<Todo> = body_json(response).await;
    assert!(todos.is_empty());
}

#[tokio::test]
async fn list_returns_all_records() {
    let app = test_app();

    for text in ["one", "two"] {
        let body = format!(r#"{{"text":"{}"}}"#, text);
        app.clone()
            .oneshot(json_request("POST", "/api/todos", &body))
            .await
            .unwrap();
    }

    let response = app.oneshot(get_request("/api/todos")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let todos: Vec<Todo> = body_json(response).await;
    assert_eq!(todos.len(), 2);
}

#[tokio::test]
async fn patch_changes_only_sent_fields() {
    let app = test_app();

    app.clone()
        .oneshot(json_request("POST", "/api/todos", r#"{"text":"Original"}"#))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request("PATCH", "/api/todos/1", r#"{"completed":true}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let envelope: Envelope = body_json(response).await;
    assert!(envelope.success);
    let data = envelope.data.unwrap();
    assert!(data.completed);
    assert_eq!(data.text, "Original");
}

#[tokio::test]
async fn delete_removes_the_record() {
    let app = test_app();

    app.clone()
        .oneshot(json_request("POST", "/api/todos", r#"{"text":"gone soon"}"#))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/todos/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let envelope: Envelope = body_json(response).await;
    assert!(envelope.success);

    // A subsequent GET no longer finds the record.
    let response = app.oneshot(get_request("/api/todos/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_with_invalid_id_is_a_client_error() {
    let app = test_app();

    let response = app.oneshot(get_request("/api/todos/abc")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unsupported_method_answers_405_with_allow_header() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/todos")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let allow = response.headers().get(header::ALLOW).unwrap();
    let allow = allow.to_str().unwrap();
    assert!(allow.contains("GET"));
    assert!(allow.contains("POST"));
}

#[tokio::test]
async fn patch_with_empty_text_is_rejected() {
    let app = test_app();

    app.clone()
        .oneshot(json_request("POST", "/api/todos", r#"{"text":"keep me"}"#))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request("PATCH", "/api/todos/1", r#"{"text":""}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(get_request("/api/todos/1")).await.unwrap();
    let todo: Todo = body_json(response).await;
    assert_eq!(todo.text, "keep me");
}
