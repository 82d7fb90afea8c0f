// ABOUTME: Task type definitions
// ABOUTME: The persisted task entity and the wire-level request/response shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use todo_tags::normalize_labels;

/// Message returned after a successful status toggle
pub const STATUS_CHANGED_MESSAGE: &str = "Status changed";

/// Message returned after a successful delete
pub const DELETED_MESSAGE: &str = "Deleted";

/// Persisted task
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<String>,
}

impl Task {
    /// Build a fresh, not yet stored task from a creation request
    pub fn new_from(request: CreateTaskDto) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: request.title.trim().to_string(),
            description: request.description.unwrap_or_default(),
            done: false,
            created_at: now,
            updated_at: now,
            tags: normalize_labels(request.tags.unwrap_or_default()),
        }
    }
}

/// Task as seen by API clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub done: bool,
    pub tags: Vec<String>,
}

impl From<Task> for TaskDto {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            done: task.done,
            tags: task.tags,
        }
    }
}

/// Request body for creating a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTaskDto {
    pub title: String,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Request body for updating a task; absent fields keep their stored value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateTaskDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub done: Option<bool>,
    pub tags: Option<Vec<String>>,
}

/// Confirmation for operations that do not return a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDto {
    pub message: String,
}

impl OperationDto {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn status_changed() -> Self {
        Self::new(STATUS_CHANGED_MESSAGE)
    }

    pub fn deleted() -> Self {
        Self::new(DELETED_MESSAGE)
    }
}
