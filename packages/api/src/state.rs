// ABOUTME: Shared application state for the API routers
// ABOUTME: Holds the task service wired to the SQLite repository

use std::sync::Arc;

use todo_storage::Database;
use todo_tasks::{SqliteTaskRepository, TaskService};

#[derive(Clone)]
pub struct AppState {
    pub task_service: Arc<TaskService>,
}

impl AppState {
    pub fn new(task_service: Arc<TaskService>) -> Self {
        Self { task_service }
    }

    /// Wire the service stack on top of an open database
    pub fn from_database(database: &Database) -> Self {
        let repository = SqliteTaskRepository::new(database.pool().clone());
        Self::new(Arc::new(TaskService::new(Arc::new(repository))))
    }
}
