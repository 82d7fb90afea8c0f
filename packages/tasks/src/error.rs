use thiserror::Error;
use uuid::Uuid;

use todo_storage::StorageError;

/// Task service errors
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Task with id {0} does not exist")]
    NotFound(Uuid),
    #[error("{0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type TaskResult<T> = Result<T, TaskError>;
