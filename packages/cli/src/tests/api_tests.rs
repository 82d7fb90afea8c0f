use crate::config::Config;
use crate::server::{build_app, MAX_BODY_BYTES};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;
use todo_api::AppState;
use todo_storage::Database;
use tower::ServiceExt;

struct TestApp {
    app: Router,
    _db: Database,
    _client_dir: TempDir,
}

async fn test_app() -> TestApp {
    let client_dir = TempDir::new().unwrap();
    fs::write(
        client_dir.path().join("index.html"),
        "<!doctype html><title>Todo</title>",
    )
    .unwrap();
    fs::write(client_dir.path().join("app.js"), "console.log('todo');").unwrap();

    let vars: HashMap<&str, String> = HashMap::from([(
        "TODO_STATIC_DIR",
        client_dir.path().display().to_string(),
    )]);
    let config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();

    let db = Database::in_memory().await.unwrap();
    let app = build_app(AppState::from_database(&db), &config).unwrap();

    TestApp {
        app,
        _db: db,
        _client_dir: client_dir,
    }
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let test = test_app().await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();

    let response = test.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_tasks_endpoint_is_mounted() {
    let test = test_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/tasks")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({ "title": "Through the server" })).unwrap(),
        ))
        .unwrap();
    let response = test.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let request = Request::builder()
        .uri("/api/v1/tasks")
        .body(Body::empty())
        .unwrap();
    let response = test.app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_api_endpoint() {
    let test = test_app().await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/nonexistent")
        .body(Body::empty())
        .unwrap();

    let response = test.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_client_app_is_served() {
    let test = test_app().await;

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = test.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("<title>Todo</title>"));

    let request = Request::builder().uri("/app.js").body(Body::empty()).unwrap();
    let response = test.app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("console.log"));
}

#[tokio::test]
async fn test_unknown_client_route_falls_back_to_index() {
    let test = test_app().await;

    let request = Request::builder()
        .uri("/tasks/some/deep/link")
        .body(Body::empty())
        .unwrap();
    let response = test.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("<title>Todo</title>"));
}

#[tokio::test]
async fn test_cors_preflight_allows_configured_origin() {
    let test = test_app().await;

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/tasks")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
        .body(Body::empty())
        .unwrap();
    let response = test.app.oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:5173"
    );
    let methods = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(methods.contains("PATCH"));
    assert!(methods.contains("DELETE"));
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let test = test_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/tasks")
        .header("content-type", "application/json")
        .header(header::CONTENT_LENGTH, MAX_BODY_BYTES + 1)
        .body(Body::from(vec![b' '; MAX_BODY_BYTES + 1]))
        .unwrap();
    let response = test.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
