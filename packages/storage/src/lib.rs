// ABOUTME: Data layer and persistence for Todo
// ABOUTME: SQLite pool construction, embedded migrations, and the shared storage error

pub mod database;
pub mod error;

pub use database::{Database, StorageConfig, MIGRATOR};
pub use error::{StorageError, StorageResult};
