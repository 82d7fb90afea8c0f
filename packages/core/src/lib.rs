// ABOUTME: Core constants shared by every Todo package
// ABOUTME: Data directory resolution and the versioned API prefix

pub mod constants;

pub use constants::{database_file, todo_dir, API_V1_PREFIX, DATABASE_FILE_NAME, TASKS_PATH};
