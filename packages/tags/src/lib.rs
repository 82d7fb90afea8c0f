// ABOUTME: Tag management for tasks
// ABOUTME: Provides the tag type and the storage layer for task tag links

pub mod storage;
pub mod types;

// Re-export main types
pub use storage::{normalize_labels, TagStorage};
pub use types::Tag;
