// ABOUTME: End-to-end tests against a running server on an ephemeral port
// ABOUTME: Loads the bundled client and walks the task flows it drives over HTTP

use std::collections::HashMap;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use todo_api::AppState;
use todo_cli::{build_app, serve, Config};
use todo_storage::Database;

struct TestServer {
    base_url: String,
    client: Client,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<std::io::Result<()>>>,
    _data_dir: TempDir,
}

impl TestServer {
    async fn start() -> Self {
        let data_dir = TempDir::new().unwrap();
        let client_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../dashboard");

        let vars: HashMap<&str, String> = HashMap::from([
            (
                "TODO_DATABASE_PATH",
                data_dir.path().join("todo.db").display().to_string(),
            ),
            ("TODO_STATIC_DIR", client_dir.display().to_string()),
        ]);
        let config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();

        let database = Database::connect(&config.storage_config()).await.unwrap();
        let app = build_app(AppState::from_database(&database), &config).unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(serve(listener, app, async move {
            let _ = rx.await;
        }));

        Self {
            base_url: format!("http://{}", addr),
            client: Client::new(),
            shutdown: Some(tx),
            handle: Some(handle),
            _data_dir: data_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create_task(&self, body: Value) -> Value {
        let response = self
            .client
            .post(self.url("/api/v1/tasks"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        response.json().await.unwrap()
    }

    async fn list_tasks(&self) -> Vec<Value> {
        self.client
            .get(self.url("/api/v1/tasks"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.await.unwrap().unwrap();
        }
    }
}

#[tokio::test]
async fn test_client_page_is_served() {
    let server = TestServer::start().await;

    let response = server.client.get(server.url("/")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-frame-options").unwrap(),
        "DENY"
    );

    let page = response.text().await.unwrap();
    for marker in [
        "id=\"task-form\"",
        "id=\"title\"",
        "id=\"description\"",
        "id=\"tag-input\"",
        "id=\"add-tag\"",
        "id=\"task-list\"",
        "id=\"edit-dialog\"",
        "app.js",
    ] {
        assert!(page.contains(marker), "client page is missing {}", marker);
    }

    let script = server.client.get(server.url("/app.js")).send().await.unwrap();
    assert_eq!(script.status(), StatusCode::OK);
    assert!(script.text().await.unwrap().contains("/api/v1/tasks"));

    server.stop().await;
}

#[tokio::test]
async fn test_add_task_with_tags() {
    let server = TestServer::start().await;

    let created = server
        .create_task(json!({
            "title": "Test Title1",
            "description": "Test Description1",
            "tags": ["foo", "bar", "baz"]
        }))
        .await;

    let tasks = server.list_tasks().await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0], created);
    assert_eq!(tasks[0]["tags"].as_array().unwrap().len(), 3);

    server.stop().await;
}

#[tokio::test]
async fn test_toggle_edit_and_delete_flow() {
    let server = TestServer::start().await;

    let created = server
        .create_task(json!({ "title": "Walk the dog", "tags": ["home"] }))
        .await;
    let id = created["id"].as_str().unwrap().to_string();
    let task_url = server.url(&format!("/api/v1/tasks/{}", id));

    // Checkbox click
    let response = server
        .client
        .patch(format!("{}/toggle-status", task_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Status changed");
    assert_eq!(server.list_tasks().await[0]["done"], true);

    // Edit dialog save
    let response = server
        .client
        .put(&task_url)
        .json(&json!({
            "title": "Walk the dog twice",
            "description": "Morning and evening",
            "tags": ["home", "daily"]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["title"], "Walk the dog twice");
    assert_eq!(updated["description"], "Morning and evening");
    assert_eq!(updated["done"], true);
    assert_eq!(updated["tags"], json!(["home", "daily"]));

    // Delete button
    let response = server.client.delete(&task_url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Deleted");
    assert!(server.list_tasks().await.is_empty());

    let response = server.client.get(&task_url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    server.stop().await;
}

#[tokio::test]
async fn test_tasks_survive_restart() {
    let data_dir = TempDir::new().unwrap();
    let db_path = data_dir.path().join("todo.db");

    let config = todo_storage::StorageConfig::with_path(&db_path);
    let database = Database::connect(&config).await.unwrap();
    let service = AppState::from_database(&database).task_service;
    service
        .create_task(create_request("Persisted"))
        .await
        .unwrap();
    database.close().await;

    let reopened = Database::connect(&config).await.unwrap();
    let tasks = AppState::from_database(&reopened)
        .task_service
        .list_tasks()
        .await
        .unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Persisted");
}

fn create_request(title: &str) -> todo_tasks::CreateTaskDto {
    todo_tasks::CreateTaskDto {
        title: title.to_string(),
        description: None,
        tags: Some(vec!["kept".to_string()]),
    }
}
