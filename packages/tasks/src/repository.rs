// ABOUTME: Task storage layer using SQLite
// ABOUTME: Repository trait plus the SQLite implementation with transactional tag handling

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use super::types::Task;
use todo_storage::{StorageError, StorageResult};
use todo_tags::TagStorage;

const SELECT_TASKS: &str = r#"
    SELECT id, title, description, done, created_at, updated_at
    FROM tasks
"#;

/// Persistence operations the task service depends on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// All tasks, oldest first
    async fn find_all(&self) -> StorageResult<Vec<Task>>;

    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Task>>;

    /// Insert the task together with its tags
    async fn create(&self, task: Task) -> StorageResult<Task>;

    /// Overwrite the mutable columns; `Some(tags)` replaces the tag list,
    /// `None` leaves it untouched. Returns `None` when no task has this id.
    async fn update(&self, task: Task, tags: Option<Vec<String>>)
        -> StorageResult<Option<Task>>;

    /// Returns false when no task has this id
    async fn set_done(&self, id: Uuid, done: bool, updated_at: DateTime<Utc>)
        -> StorageResult<bool>;

    /// Returns false when no task has this id
    async fn delete(&self, id: Uuid) -> StorageResult<bool>;
}

pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_task(conn: &mut SqliteConnection, id: Uuid) -> StorageResult<Option<Task>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_TASKS))
            .bind(id.to_string())
            .fetch_optional(&mut *conn)
            .await
            .map_err(StorageError::Sqlx)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut task = row_to_task(&row)?;
        task.tags = TagStorage::labels_for_task(conn, &task.id.to_string()).await?;
        Ok(Some(task))
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn find_all(&self) -> StorageResult<Vec<Task>> {
        debug!("Fetching all tasks");

        let mut conn = self.pool.acquire().await.map_err(StorageError::Sqlx)?;

        let rows = sqlx::query(&format!("{} ORDER BY created_at, rowid", SELECT_TASKS))
            .fetch_all(&mut *conn)
            .await
            .map_err(StorageError::Sqlx)?;

        let mut tags = TagStorage::labels_by_task(&mut conn).await?;

        rows.iter()
            .map(|row| {
                let mut task = row_to_task(row)?;
                task.tags = tags.remove(&task.id.to_string()).unwrap_or_default();
                Ok(task)
            })
            .collect()
    }

    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Task>> {
        debug!("Fetching task: {}", id);

        let mut conn = self.pool.acquire().await.map_err(StorageError::Sqlx)?;
        Self::fetch_task(&mut conn, id).await
    }

    async fn create(&self, task: Task) -> StorageResult<Task> {
        debug!("Creating task: {} (title: {})", task.id, task.title);

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        sqlx::query(
            r#"
            INSERT INTO tasks (id, title, description, done, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(task.id.to_string())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.done)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        TagStorage::attach(&mut tx, &task.id.to_string(), &task.tags).await?;

        let created = Self::fetch_task(&mut tx, task.id)
            .await?
            .ok_or_else(|| StorageError::InvalidData(format!("task {} missing after insert", task.id)))?;

        tx.commit().await.map_err(StorageError::Sqlx)?;

        Ok(created)
    }

    async fn update(
        &self,
        task: Task,
        tags: Option<Vec<String>>,
    ) -> StorageResult<Option<Task>> {
        debug!("Updating task: {}", task.id);

        let task_id = task.id.to_string();
        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET title = ?, description = ?, done = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.done)
        .bind(task.updated_at)
        .bind(&task_id)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        if let Some(tags) = tags {
            TagStorage::detach_all(&mut tx, &task_id).await?;
            TagStorage::attach(&mut tx, &task_id, &tags).await?;
            TagStorage::prune_orphans(&mut tx).await?;
        }

        let updated = Self::fetch_task(&mut tx, task.id).await?;

        tx.commit().await.map_err(StorageError::Sqlx)?;

        Ok(updated)
    }

    async fn set_done(
        &self,
        id: Uuid,
        done: bool,
        updated_at: DateTime<Utc>,
    ) -> StorageResult<bool> {
        debug!("Setting task {} done = {}", id, done);

        let result = sqlx::query("UPDATE tasks SET done = ?, updated_at = ? WHERE id = ?")
            .bind(done)
            .bind(updated_at)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> StorageResult<bool> {
        debug!("Deleting task: {}", id);

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        // task_tags rows go with the task through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

        TagStorage::prune_orphans(&mut tx).await?;

        tx.commit().await.map_err(StorageError::Sqlx)?;

        Ok(result.rows_affected() > 0)
    }
}

/// Convert a database row to a Task without its tags
fn row_to_task(row: &sqlx::sqlite::SqliteRow) -> StorageResult<Task> {
    let id: String = row.try_get("id").map_err(StorageError::Sqlx)?;
    let id = Uuid::parse_str(&id)
        .map_err(|e| StorageError::InvalidData(format!("task id '{}': {}", id, e)))?;

    Ok(Task {
        id,
        title: row.try_get("title").map_err(StorageError::Sqlx)?,
        description: row.try_get("description").map_err(StorageError::Sqlx)?,
        done: row.try_get("done").map_err(StorageError::Sqlx)?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
        tags: Vec::new(),
    })
}
