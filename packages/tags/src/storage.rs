// ABOUTME: Tag storage layer using SQLite
// ABOUTME: Resolves labels to shared tag rows and maintains ordered task links

use std::collections::{HashMap, HashSet};

use sqlx::{Row, SqliteConnection};
use tracing::debug;

use super::types::Tag;
use todo_storage::StorageError;

/// Trim labels, drop blanks, and keep only the first occurrence of each
pub fn normalize_labels<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    labels
        .into_iter()
        .map(|label| label.as_ref().trim().to_string())
        .filter(|label| !label.is_empty())
        .filter(|label| seen.insert(label.clone()))
        .collect()
}

/// Tag persistence.
///
/// Every operation takes the connection explicitly so it can join the
/// caller's transaction.
pub struct TagStorage;

impl TagStorage {
    /// Look up a tag by its exact name
    pub async fn find_by_name(
        conn: &mut SqliteConnection,
        name: &str,
    ) -> Result<Option<Tag>, StorageError> {
        let row = sqlx::query("SELECT id, name, created_at FROM tags WHERE name = ?")
            .bind(name)
            .fetch_optional(&mut *conn)
            .await
            .map_err(StorageError::Sqlx)?;

        row.as_ref().map(row_to_tag).transpose()
    }

    /// Resolve a label to its tag row, inserting it when missing
    pub async fn get_or_create(conn: &mut SqliteConnection, name: &str) -> Result<Tag, StorageError> {
        if let Some(tag) = Self::find_by_name(conn, name).await? {
            return Ok(tag);
        }

        let tag = Tag::new(name);
        debug!("Creating tag: {} (name: {})", tag.id, tag.name);

        sqlx::query(
            r#"
            INSERT INTO tags (id, name, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT(name) DO NOTHING
            "#,
        )
        .bind(&tag.id)
        .bind(&tag.name)
        .bind(tag.created_at)
        .execute(&mut *conn)
        .await
        .map_err(StorageError::Sqlx)?;

        Self::find_by_name(conn, name).await?.ok_or_else(|| {
            StorageError::InvalidData(format!("tag '{}' vanished after insert", name))
        })
    }

    /// Link labels to a task in the given order
    pub async fn attach<S: AsRef<str>>(
        conn: &mut SqliteConnection,
        task_id: &str,
        labels: &[S],
    ) -> Result<(), StorageError> {
        let labels = normalize_labels(labels);
        debug!("Attaching {} tags to task: {}", labels.len(), task_id);

        for (position, label) in labels.iter().enumerate() {
            let tag = Self::get_or_create(conn, label).await?;

            sqlx::query("INSERT INTO task_tags (task_id, tag_id, position) VALUES (?, ?, ?)")
                .bind(task_id)
                .bind(&tag.id)
                .bind(position as i64)
                .execute(&mut *conn)
                .await
                .map_err(StorageError::Sqlx)?;
        }

        Ok(())
    }

    /// Remove every tag link of a task, returning how many were removed
    pub async fn detach_all(conn: &mut SqliteConnection, task_id: &str) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM task_tags WHERE task_id = ?")
            .bind(task_id)
            .execute(&mut *conn)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(result.rows_affected())
    }

    /// Labels of one task, in link order
    pub async fn labels_for_task(
        conn: &mut SqliteConnection,
        task_id: &str,
    ) -> Result<Vec<String>, StorageError> {
        let labels: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT t.name
            FROM task_tags tt
            JOIN tags t ON t.id = tt.tag_id
            WHERE tt.task_id = ?
            ORDER BY tt.position
            "#,
        )
        .bind(task_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(labels)
    }

    /// Labels of every task that has any, keyed by task id
    pub async fn labels_by_task(
        conn: &mut SqliteConnection,
    ) -> Result<HashMap<String, Vec<String>>, StorageError> {
        let rows = sqlx::query(
            r#"
            SELECT tt.task_id, t.name
            FROM task_tags tt
            JOIN tags t ON t.id = tt.tag_id
            ORDER BY tt.task_id, tt.position
            "#,
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(StorageError::Sqlx)?;

        let mut by_task: HashMap<String, Vec<String>> = HashMap::new();
        for row in rows {
            let task_id: String = row.try_get("task_id").map_err(StorageError::Sqlx)?;
            let name: String = row.try_get("name").map_err(StorageError::Sqlx)?;
            by_task.entry(task_id).or_default().push(name);
        }

        Ok(by_task)
    }

    /// Delete tags no task links to anymore
    pub async fn prune_orphans(conn: &mut SqliteConnection) -> Result<u64, StorageError> {
        let result = sqlx::query(
            r#"
            DELETE FROM tags
            WHERE NOT EXISTS (SELECT 1 FROM task_tags tt WHERE tt.tag_id = tags.id)
            "#,
        )
        .execute(&mut *conn)
        .await
        .map_err(StorageError::Sqlx)?;

        if result.rows_affected() > 0 {
            debug!("Pruned {} orphaned tags", result.rows_affected());
        }

        Ok(result.rows_affected())
    }
}

/// Convert a database row to a Tag
fn row_to_tag(row: &sqlx::sqlite::SqliteRow) -> Result<Tag, StorageError> {
    Ok(Tag {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        name: row.try_get("name").map_err(StorageError::Sqlx)?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
    })
}
