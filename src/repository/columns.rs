use crate::db::models::{Column, ColumnUpdate, OrderEntry};
use crate::error::Result;
use crate::ids::generate_id;
use crate::sql_constants::{APPEND_COLUMN, CHECK_COLUMN_EXISTS, SELECT_COLUMN};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

pub struct ColumnRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ColumnRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a column after the project's current last column
    pub async fn create(
        &self,
        project_id: &str,
        title: &str,
        color: Option<&str>,
    ) -> Result<Column> {
        let mut column = Column {
            id: generate_id(),
            project_id: project_id.to_string(),
            title: title.to_string(),
            color: color.map(str::to_string),
            order_index: 0,
        };

        column.order_index = sqlx::query_scalar(APPEND_COLUMN)
            .bind(&column.id)
            .bind(&column.project_id)
            .bind(&column.title)
            .bind(&column.color)
            .fetch_one(self.pool)
            .await?;

        Ok(column)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Column>> {
        let column = sqlx::query_as::<_, Column>(&format!("{} WHERE id = ?", SELECT_COLUMN))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(column)
    }

    pub async fn exists(&self, id: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(CHECK_COLUMN_EXISTS)
            .bind(id)
            .fetch_one(self.pool)
            .await?;

        Ok(exists)
    }

    /// Columns of a project in display order
    pub async fn list_by_project(&self, project_id: &str) -> Result<Vec<Column>> {
        let columns = sqlx::query_as::<_, Column>(&format!(
            "{} WHERE project_id = ? ORDER BY order_index ASC, rowid ASC",
            SELECT_COLUMN
        ))
        .bind(project_id)
        .fetch_all(self.pool)
        .await?;

        Ok(columns)
    }

    pub async fn update(&self, id: &str, update: &ColumnUpdate) -> Result<bool> {
        if update.is_empty() {
            return Ok(false);
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE columns SET ");
        {
            let mut fields = builder.separated(", ");
            if let Some(title) = &update.title {
                fields.push("title = ").push_bind_unseparated(title.as_str());
            }
            if let Some(color) = &update.color {
                fields.push("color = ").push_bind_unseparated(color.as_deref());
            }
        }
        builder.push(" WHERE id = ").push_bind(id);

        let result = builder.build().execute(self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a column together with its tasks
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM columns WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Apply every `(column, order)` pair or none of them
    pub async fn update_order(&self, entries: &[OrderEntry]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        if let Err(e) = apply_column_order(&mut tx, entries).await {
            tracing::error!(error = %e, "Column reorder failed, rolling back");
            tx.rollback().await?;
            return Err(e);
        }

        tx.commit().await?;
        Ok(())
    }
}

pub(crate) async fn insert_column(
    conn: &mut SqliteConnection,
    project_id: &str,
    title: &str,
    color: Option<&str>,
    order_index: i64,
) -> Result<Column> {
    let column = Column {
        id: generate_id(),
        project_id: project_id.to_string(),
        title: title.to_string(),
        color: color.map(str::to_string),
        order_index,
    };

    sqlx::query(
        "INSERT INTO columns (id, project_id, title, color, order_index) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&column.id)
    .bind(&column.project_id)
    .bind(&column.title)
    .bind(&column.color)
    .bind(column.order_index)
    .execute(&mut *conn)
    .await?;

    Ok(column)
}

pub(crate) async fn apply_column_order(
    conn: &mut SqliteConnection,
    entries: &[OrderEntry],
) -> Result<()> {
    for entry in entries {
        sqlx::query("UPDATE columns SET order_index = ? WHERE id = ?")
            .bind(entry.order)
            .bind(&entry.id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}
