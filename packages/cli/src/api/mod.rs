use axum::{http::Uri, routing::get, Router};
use todo_api::{AppError, AppState};

pub mod health;

/// Prefix shared by every JSON route; unmatched paths below it never reach the client app
pub const API_ROOT: &str = "/api/";

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_check))
        .merge(todo_api::create_api_router(state))
}

/// JSON 404 for unknown API paths
pub fn api_not_found(uri: &Uri) -> AppError {
    AppError::NotFound(format!("No API route for {}", uri.path()))
}
