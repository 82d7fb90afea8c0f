use std::env;
use std::path::PathBuf;

/// Versioned prefix every REST route lives under
pub const API_V1_PREFIX: &str = "/api/v1";

/// Path of the task collection, relative to the API prefix
pub const TASKS_PATH: &str = "/tasks";

/// File name of the SQLite database inside the data directory
pub const DATABASE_FILE_NAME: &str = "todo.db";

/// Get the path to the Todo data directory (~/.todo)
pub fn todo_dir() -> PathBuf {
    // HOME wins over the platform lookup so tests can redirect it
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".todo")
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".todo")
    }
}

/// Get the default database location (~/.todo/todo.db)
pub fn database_file() -> PathBuf {
    todo_dir().join(DATABASE_FILE_NAME)
}
