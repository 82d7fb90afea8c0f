// ABOUTME: HTTP request handlers for task operations
// ABOUTME: Handles CRUD and status toggling for tasks through the task service

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use super::error::{ApiResult, AppError};
use super::state::AppState;
use todo_tasks::{CreateTaskDto, OperationDto, TaskDto, UpdateTaskDto};

/// Parse a task id path segment
fn parse_task_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::validation(format!("Invalid task id '{}'", raw)))
}

/// List all tasks
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<TaskDto>>> {
    info!("Listing tasks");

    let tasks = state.task_service.list_tasks().await?;
    Ok(Json(tasks))
}

/// Get a single task by ID
pub async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<TaskDto>> {
    info!("Getting task: {}", task_id);

    let id = parse_task_id(&task_id)?;
    let task = state.task_service.get_task(id).await?;
    Ok(Json(task))
}

/// Create a new task
pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskDto>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TaskDto>)> {
    let Json(request) = payload?;
    info!("Creating task '{}'", request.title);

    let task = state.task_service.create_task(request).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Update an existing task
pub async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    payload: Result<Json<UpdateTaskDto>, JsonRejection>,
) -> ApiResult<Json<TaskDto>> {
    info!("Updating task: {}", task_id);

    let id = parse_task_id(&task_id)?;
    let Json(request) = payload?;
    let task = state.task_service.update_task(id, request).await?;
    Ok(Json(task))
}

/// Flip a task's done flag
pub async fn toggle_task_status(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<OperationDto>> {
    info!("Toggling status of task: {}", task_id);

    let id = parse_task_id(&task_id)?;
    let result = state.task_service.toggle_task_status(id).await?;
    Ok(Json(result))
}

/// Delete a task
pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<OperationDto>> {
    info!("Deleting task: {}", task_id);

    let id = parse_task_id(&task_id)?;
    let result = state.task_service.delete_task(id).await?;
    Ok(Json(result))
}
