use axum::Json;
use serde_json::{json, Value};

pub const SERVICE_NAME: &str = "todo-cli";

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().timestamp(),
        "version": env!("CARGO_PKG_VERSION"),
        "service": SERVICE_NAME
    }))
}
