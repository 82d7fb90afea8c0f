// ABOUTME: Tag type definitions
// ABOUTME: A tag is a label shared by every task that carries it

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    /// Build a not-yet-persisted tag with a fresh identifier
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: format!("tag-{}", nanoid::nanoid!()),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}
