// ABOUTME: Task management for the todo service
// ABOUTME: Provides task entities, SQLite persistence, and the validating task service

pub mod error;
pub mod repository;
pub mod service;
pub mod types;

pub use error::{TaskError, TaskResult};
pub use repository::{SqliteTaskRepository, TaskRepository};
pub use service::{TaskService, MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH};
pub use types::*;
