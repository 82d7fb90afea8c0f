// ABOUTME: HTTP API layer for the todo service providing REST endpoints and routing
// ABOUTME: Integration layer between axum and the task service

use axum::{
    routing::{get, patch},
    Router,
};

use todo_core::{API_V1_PREFIX, TASKS_PATH};

pub mod error;
pub mod state;
pub mod tasks_handlers;

pub use error::{ApiResult, AppError};
pub use state::AppState;

/// Creates the tasks API router (nested under /api/v1/tasks)
pub fn create_tasks_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(tasks_handlers::list_tasks).post(tasks_handlers::create_task),
        )
        .route(
            "/{id}",
            get(tasks_handlers::get_task)
                .put(tasks_handlers::update_task)
                .delete(tasks_handlers::delete_task),
        )
        .route(
            "/{id}/toggle-status",
            patch(tasks_handlers::toggle_task_status),
        )
}

/// Full versioned API with state applied
pub fn create_api_router(state: AppState) -> Router {
    Router::new()
        .nest(
            &format!("{}{}", API_V1_PREFIX, TASKS_PATH),
            create_tasks_router(),
        )
        .with_state(state)
}
