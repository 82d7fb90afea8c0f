// ABOUTME: Task service coordinating validation and persistence
// ABOUTME: Maps between wire DTOs and stored tasks and reports missing tasks

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use super::error::{TaskError, TaskResult};
use super::repository::TaskRepository;
use super::types::{CreateTaskDto, OperationDto, Task, TaskDto, UpdateTaskDto};
use todo_tags::normalize_labels;

pub const MAX_TITLE_LENGTH: usize = 255;
pub const MAX_DESCRIPTION_LENGTH: usize = 10_000;

pub struct TaskService {
    repository: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_tasks(&self) -> TaskResult<Vec<TaskDto>> {
        debug!("Listing tasks");
        let tasks = self.repository.find_all().await?;
        Ok(tasks.into_iter().map(TaskDto::from).collect())
    }

    pub async fn get_task(&self, id: Uuid) -> TaskResult<TaskDto> {
        debug!("Getting task: {}", id);
        self.find_task(id).await.map(TaskDto::from)
    }

    pub async fn create_task(&self, request: CreateTaskDto) -> TaskResult<TaskDto> {
        validate_title(&request.title)?;
        if let Some(description) = &request.description {
            validate_description(description)?;
        }

        let task = Task::new_from(request);
        info!("Creating task: {} (title: {})", task.id, task.title);

        let created = self.repository.create(task).await?;
        Ok(created.into())
    }

    /// Apply the supplied fields to an existing task
    pub async fn update_task(&self, id: Uuid, request: UpdateTaskDto) -> TaskResult<TaskDto> {
        let mut task = self.find_task(id).await?;

        if let Some(title) = request.title {
            validate_title(&title)?;
            task.title = title.trim().to_string();
        }
        if let Some(description) = request.description {
            validate_description(&description)?;
            task.description = description;
        }
        if let Some(done) = request.done {
            task.done = done;
        }
        task.updated_at = Utc::now();

        info!("Updating task: {}", id);
        let tags = request.tags.map(normalize_labels);
        self.repository
            .update(task, tags)
            .await?
            .map(TaskDto::from)
            .ok_or(TaskError::NotFound(id))
    }

    pub async fn toggle_task_status(&self, id: Uuid) -> TaskResult<OperationDto> {
        let task = self.find_task(id).await?;
        let done = !task.done;

        info!("Toggling task {} to done = {}", id, done);
        if !self.repository.set_done(id, done, Utc::now()).await? {
            return Err(TaskError::NotFound(id));
        }

        Ok(OperationDto::status_changed())
    }

    pub async fn delete_task(&self, id: Uuid) -> TaskResult<OperationDto> {
        info!("Deleting task: {}", id);
        if !self.repository.delete(id).await? {
            return Err(TaskError::NotFound(id));
        }

        Ok(OperationDto::deleted())
    }

    async fn find_task(&self, id: Uuid) -> TaskResult<Task> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TaskError::NotFound(id))
    }
}

fn validate_title(title: &str) -> TaskResult<()> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TaskError::Validation("Title must not be blank".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(TaskError::Validation(format!(
            "Title must be at most {} characters",
            MAX_TITLE_LENGTH
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> TaskResult<()> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(TaskError::Validation(format!(
            "Description must be at most {} characters",
            MAX_DESCRIPTION_LENGTH
        )));
    }
    Ok(())
}
