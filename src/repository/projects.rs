use crate::db::models::{Project, ProjectSummary, ProjectUpdate};
use crate::error::Result;
use crate::ids::generate_id;
use crate::sql_constants::{CHECK_PROJECT_EXISTS, SELECT_PROJECT, SELECT_PROJECT_SUMMARIES};
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

pub struct ProjectRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProjectRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a bare project (no columns)
    pub async fn create(&self, name: &str, description: Option<&str>) -> Result<Project> {
        let mut conn = self.pool.acquire().await?;
        insert_project(&mut conn, name, description).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(&format!("{} WHERE id = ?", SELECT_PROJECT))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(project)
    }

    pub async fn exists(&self, id: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(CHECK_PROJECT_EXISTS)
            .bind(id)
            .fetch_one(self.pool)
            .await?;

        Ok(exists)
    }

    /// All projects with their column and task counts, newest first
    pub async fn list(&self) -> Result<Vec<ProjectSummary>> {
        let projects = sqlx::query_as::<_, ProjectSummary>(SELECT_PROJECT_SUMMARIES)
            .fetch_all(self.pool)
            .await?;

        Ok(projects)
    }

    /// Apply the present fields; returns whether a row changed
    pub async fn update(&self, id: &str, update: &ProjectUpdate) -> Result<bool> {
        if update.is_empty() {
            return Ok(false);
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE projects SET ");
        {
            let mut fields = builder.separated(", ");
            if let Some(name) = &update.name {
                fields.push("name = ").push_bind_unseparated(name.as_str());
            }
            if let Some(description) = &update.description {
                fields
                    .push("description = ")
                    .push_bind_unseparated(description.as_deref());
            }
        }
        builder.push(" WHERE id = ").push_bind(id);

        let result = builder.build().execute(self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a project; columns, tasks and tags go with it
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

pub(crate) async fn insert_project(
    conn: &mut SqliteConnection,
    name: &str,
    description: Option<&str>,
) -> Result<Project> {
    let project = Project {
        id: generate_id(),
        name: name.to_string(),
        description: description.map(str::to_string),
        created_at: Utc::now(),
    };

    sqlx::query("INSERT INTO projects (id, name, description, created_at) VALUES (?, ?, ?, ?)")
        .bind(&project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.created_at)
        .execute(&mut *conn)
        .await?;

    Ok(project)
}
