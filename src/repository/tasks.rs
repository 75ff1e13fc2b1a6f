use super::{attach_tags, group_tags};
use crate::db::models::{NewTask, OrderEntry, SearchResult, Task, TaskUpdate};
use crate::error::Result;
use crate::ids::generate_id;
use crate::sql_constants::{
    APPEND_TASK, CHECK_TASK_EXISTS, DELETE_TAGS_FOR_TASK, INSERT_TAG, SELECT_TAGS_FOR_TASK,
    SELECT_TASK, TASK_COLUMNS, TASK_ORDER,
};
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::collections::HashMap;

pub struct TaskRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TaskRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a task at the end of its column, together with its tags
    pub async fn create(&self, column_id: &str, new_task: &NewTask) -> Result<Task> {
        let mut tx = self.pool.begin().await?;
        let task = insert_task(&mut tx, column_id, new_task).await?;
        tx.commit().await?;
        Ok(task)
    }

    /// Get a single task with its tags
    pub async fn get(&self, id: &str) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!("{} WHERE t.id = ?", SELECT_TASK))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        let Some(mut task) = task else {
            return Ok(None);
        };

        task.tags = sqlx::query_scalar(SELECT_TAGS_FOR_TASK)
            .bind(id)
            .fetch_all(self.pool)
            .await?;

        Ok(Some(task))
    }

    pub async fn exists(&self, id: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(CHECK_TASK_EXISTS)
            .bind(id)
            .fetch_one(self.pool)
            .await?;

        Ok(exists)
    }

    /// Tasks of a column in display order, each with its tags
    pub async fn list_by_column(&self, column_id: &str) -> Result<Vec<Task>> {
        let mut tasks = sqlx::query_as::<_, Task>(&format!(
            "{} WHERE t.column_id = ? ORDER BY {}",
            SELECT_TASK, TASK_ORDER
        ))
        .bind(column_id)
        .fetch_all(self.pool)
        .await?;

        let rows: Vec<(String, String)> = sqlx::query_as(
            r#"
            SELECT tt.task_id, tt.tag_name
            FROM task_tags tt
            JOIN tasks t ON tt.task_id = t.id
            WHERE t.column_id = ?
            ORDER BY tt.rowid ASC
            "#,
        )
        .bind(column_id)
        .fetch_all(self.pool)
        .await?;

        attach_tags(&mut tasks, &mut group_tags(rows));
        Ok(tasks)
    }

    /// Every task of a project, grouped by column id, each group in display order
    pub async fn list_by_project(&self, project_id: &str) -> Result<HashMap<String, Vec<Task>>> {
        let mut tasks = sqlx::query_as::<_, Task>(&format!(
            "{} JOIN columns c ON t.column_id = c.id WHERE c.project_id = ? ORDER BY {}",
            SELECT_TASK, TASK_ORDER
        ))
        .bind(project_id)
        .fetch_all(self.pool)
        .await?;

        let mut tags = self.tags_for_project(project_id).await?;
        attach_tags(&mut tasks, &mut tags);

        let mut by_column: HashMap<String, Vec<Task>> = HashMap::new();
        for task in tasks {
            by_column
                .entry(task.column_id.clone())
                .or_default()
                .push(task);
        }
        Ok(by_column)
    }

    /// Tag lists of every task in a project, keyed by task id
    pub async fn tags_for_project(&self, project_id: &str) -> Result<HashMap<String, Vec<String>>> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            r#"
            SELECT tt.task_id, tt.tag_name
            FROM task_tags tt
            JOIN tasks t ON tt.task_id = t.id
            JOIN columns c ON t.column_id = c.id
            WHERE c.project_id = ?
            ORDER BY tt.rowid ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(self.pool)
        .await?;

        Ok(group_tags(rows))
    }

    /// Apply the present non-tag fields; returns whether a row changed
    pub async fn update(&self, id: &str, update: &TaskUpdate) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;
        update_task_fields(&mut conn, id, update).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Apply every `(task, order)` pair or none of them
    pub async fn update_order(&self, entries: &[OrderEntry]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        if let Err(e) = apply_task_order(&mut tx, entries).await {
            tracing::error!(error = %e, "Task reorder failed, rolling back");
            tx.rollback().await?;
            return Err(e);
        }

        tx.commit().await?;
        Ok(())
    }

    /// Substring search over title, description and assignee within one
    /// project, newest first
    pub async fn search(&self, project_id: &str, term: &str) -> Result<Vec<SearchResult>> {
        let pattern = format!("%{}%", escape_like(term));

        let mut results = sqlx::query_as::<_, SearchResult>(&format!(
            r#"
            SELECT {}, c.title AS column_title
            FROM tasks t
            JOIN columns c ON t.column_id = c.id
            WHERE c.project_id = ?
              AND (t.title LIKE ? ESCAPE '\'
                   OR t.description LIKE ? ESCAPE '\'
                   OR t.assignee LIKE ? ESCAPE '\')
            ORDER BY t.created_at DESC, t.rowid DESC
            "#,
            TASK_COLUMNS
        ))
        .bind(project_id)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(self.pool)
        .await?;

        if !results.is_empty() {
            let mut tags = self.tags_for_project(project_id).await?;
            for result in results.iter_mut() {
                result.task.tags = tags.remove(&result.task.id).unwrap_or_default();
            }
        }

        Ok(results)
    }
}

/// Escape LIKE wildcards so the term matches literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub(crate) async fn insert_task(
    conn: &mut SqliteConnection,
    column_id: &str,
    new_task: &NewTask,
) -> Result<Task> {
    let mut task = Task {
        id: generate_id(),
        column_id: column_id.to_string(),
        title: new_task.title.clone(),
        description: new_task.description.clone(),
        assignee: new_task.assignee.clone(),
        due_date: new_task.due_date.clone(),
        priority: new_task.priority,
        created_at: Utc::now(),
        order_index: 0,
        tags: Vec::new(),
    };

    task.order_index = sqlx::query_scalar(APPEND_TASK)
        .bind(&task.id)
        .bind(&task.column_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.assignee)
        .bind(&task.due_date)
        .bind(task.priority.as_str())
        .bind(task.created_at)
        .fetch_one(&mut *conn)
        .await?;

    if !new_task.tags.is_empty() {
        task.tags = insert_tags(conn, &task.id, &new_task.tags).await?;
    }

    Ok(task)
}

/// Insert tags, collapsing duplicates; returns the stored set in input order
pub(crate) async fn insert_tags(
    conn: &mut SqliteConnection,
    task_id: &str,
    tags: &[String],
) -> Result<Vec<String>> {
    let mut stored: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if stored.contains(tag) {
            continue;
        }
        sqlx::query(INSERT_TAG)
            .bind(task_id)
            .bind(tag)
            .execute(&mut *conn)
            .await?;
        stored.push(tag.clone());
    }
    Ok(stored)
}

/// Replace every tag of a task
pub(crate) async fn set_task_tags(
    conn: &mut SqliteConnection,
    task_id: &str,
    tags: &[String],
) -> Result<Vec<String>> {
    sqlx::query(DELETE_TAGS_FOR_TASK)
        .bind(task_id)
        .execute(&mut *conn)
        .await?;

    insert_tags(conn, task_id, tags).await
}

pub(crate) async fn update_task_fields(
    conn: &mut SqliteConnection,
    id: &str,
    update: &TaskUpdate,
) -> Result<bool> {
    if !update.has_field_changes() {
        return Ok(false);
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE tasks SET ");
    {
        let mut fields = builder.separated(", ");
        if let Some(title) = &update.title {
            fields.push("title = ").push_bind_unseparated(title.as_str());
        }
        if let Some(description) = &update.description {
            fields
                .push("description = ")
                .push_bind_unseparated(description.as_deref());
        }
        if let Some(assignee) = &update.assignee {
            fields
                .push("assignee = ")
                .push_bind_unseparated(assignee.as_deref());
        }
        if let Some(due_date) = &update.due_date {
            fields
                .push("due_date = ")
                .push_bind_unseparated(due_date.as_deref());
        }
        if let Some(priority) = update.priority {
            fields
                .push("priority = ")
                .push_bind_unseparated(priority.as_str());
        }
    }
    builder.push(" WHERE id = ").push_bind(id);

    let result = builder.build().execute(&mut *conn).await?;
    Ok(result.rows_affected() > 0)
}

/// Point a task at another column; returns whether the task exists
pub(crate) async fn set_task_column(
    conn: &mut SqliteConnection,
    id: &str,
    column_id: &str,
) -> Result<bool> {
    let result = sqlx::query("UPDATE tasks SET column_id = ? WHERE id = ?")
        .bind(column_id)
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Task ids of a column in display order
pub(crate) async fn task_ids_in_column(
    conn: &mut SqliteConnection,
    column_id: &str,
) -> Result<Vec<String>> {
    let ids = sqlx::query_scalar(&format!(
        "SELECT t.id FROM tasks t WHERE t.column_id = ? ORDER BY {}",
        TASK_ORDER
    ))
    .bind(column_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(ids)
}

pub(crate) async fn apply_task_order(
    conn: &mut SqliteConnection,
    entries: &[OrderEntry],
) -> Result<()> {
    for entry in entries {
        sqlx::query("UPDATE tasks SET order_index = ? WHERE id = ?")
            .bind(entry.order)
            .bind(&entry.id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}
