use crate::db::models::{
    Column, ColumnUpdate, ColumnWithTasks, NewTask, Project, ProjectSummary, ProjectUpdate,
    ProjectWithColumns, SearchResult, Task, TaskUpdate,
};
use crate::error::{KanbanError, Result};
use crate::ordering::{dense_order, splice_into};
use crate::repository::{columns, projects, tasks};
use crate::repository::{ColumnRepository, ProjectRepository, TaskRepository};
use sqlx::SqlitePool;

/// Columns seeded into every new project: (title, order, color)
pub const DEFAULT_COLUMNS: [(&str, i64, &str); 3] = [
    ("To Do", 1, "#64748b"),
    ("In Progress", 2, "#3b82f6"),
    ("Done", 3, "#22c55e"),
];

/// Board operations spanning several repository calls
pub struct BoardService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BoardService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    fn projects(&self) -> ProjectRepository<'a> {
        ProjectRepository::new(self.pool)
    }

    fn columns(&self) -> ColumnRepository<'a> {
        ColumnRepository::new(self.pool)
    }

    fn tasks(&self) -> TaskRepository<'a> {
        TaskRepository::new(self.pool)
    }

    // ------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------

    pub async fn list_projects(&self) -> Result<Vec<ProjectSummary>> {
        self.projects().list().await
    }

    /// Create a project seeded with the default columns (atomic)
    pub async fn create_project_with_defaults(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<ProjectWithColumns> {
        let mut tx = self.pool.begin().await?;

        let project = projects::insert_project(&mut tx, name, description).await?;
        let mut seeded = Vec::with_capacity(DEFAULT_COLUMNS.len());
        for (title, order, color) in DEFAULT_COLUMNS {
            let column =
                columns::insert_column(&mut tx, &project.id, title, Some(color), order).await?;
            seeded.push(ColumnWithTasks {
                column,
                tasks: Vec::new(),
            });
        }

        tx.commit().await?;
        crate::log_board_operation!("create_project", &project.id);

        Ok(ProjectWithColumns {
            project,
            columns: seeded,
        })
    }

    pub async fn get_project(&self, project_id: &str) -> Result<Project> {
        self.projects()
            .get(project_id)
            .await?
            .ok_or_else(|| KanbanError::project_not_found(project_id))
    }

    /// Compose project → ordered columns → ordered tasks with tags
    pub async fn get_project_with_columns(&self, project_id: &str) -> Result<ProjectWithColumns> {
        let project = self.get_project(project_id).await?;
        let columns = self.columns().list_by_project(project_id).await?;
        let mut tasks_by_column = self.tasks().list_by_project(project_id).await?;

        let columns = columns
            .into_iter()
            .map(|column| {
                let tasks = tasks_by_column.remove(&column.id).unwrap_or_default();
                ColumnWithTasks { column, tasks }
            })
            .collect();

        Ok(ProjectWithColumns { project, columns })
    }

    /// Returns false when nothing changed (absent project or empty update)
    pub async fn update_project(&self, project_id: &str, update: &ProjectUpdate) -> Result<bool> {
        let changed = self.projects().update(project_id, update).await?;
        if changed {
            crate::log_board_operation!("update_project", project_id);
        }
        Ok(changed)
    }

    pub async fn delete_project(&self, project_id: &str) -> Result<bool> {
        let deleted = self.projects().delete(project_id).await?;
        if deleted {
            crate::log_board_operation!("delete_project", project_id);
        }
        Ok(deleted)
    }

    // ------------------------------------------------------------------
    // Columns
    // ------------------------------------------------------------------

    pub async fn get_column(&self, column_id: &str) -> Result<Column> {
        self.columns()
            .get(column_id)
            .await?
            .ok_or_else(|| KanbanError::column_not_found(column_id))
    }

    pub async fn create_column(
        &self,
        project_id: &str,
        title: &str,
        color: Option<&str>,
    ) -> Result<Column> {
        if !self.projects().exists(project_id).await? {
            return Err(KanbanError::project_not_found(project_id));
        }

        let column = self.columns().create(project_id, title, color).await?;
        crate::log_board_operation!("create_column", &column.id);
        Ok(column)
    }

    pub async fn update_column(&self, column_id: &str, update: &ColumnUpdate) -> Result<bool> {
        let changed = self.columns().update(column_id, update).await?;
        if changed {
            crate::log_board_operation!("update_column", column_id);
        }
        Ok(changed)
    }

    pub async fn delete_column(&self, column_id: &str) -> Result<bool> {
        let deleted = self.columns().delete(column_id).await?;
        if deleted {
            crate::log_board_operation!("delete_column", column_id);
        }
        Ok(deleted)
    }

    /// Rewrite the column order of a project as `0..n-1`
    pub async fn reorder_columns(&self, project_id: &str, column_ids: &[String]) -> Result<()> {
        if !self.projects().exists(project_id).await? {
            return Err(KanbanError::project_not_found(project_id));
        }

        self.columns().update_order(&dense_order(column_ids)).await?;
        crate::log_board_operation!("reorder_columns", project_id, column_ids.len());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    pub async fn get_task(&self, task_id: &str) -> Result<Task> {
        self.tasks()
            .get(task_id)
            .await?
            .ok_or_else(|| KanbanError::task_not_found(task_id))
    }

    /// Append a task to a column; the row and its tags commit together
    pub async fn create_task(&self, column_id: &str, data: &NewTask) -> Result<Task> {
        if !self.columns().exists(column_id).await? {
            return Err(KanbanError::column_not_found(column_id));
        }

        let task = self.tasks().create(column_id, data).await?;
        crate::log_board_operation!("create_task", &task.id);
        Ok(task)
    }

    /// Apply field changes and tag replacement in one transaction
    pub async fn update_task(&self, task_id: &str, update: &TaskUpdate) -> Result<Task> {
        if !self.tasks().exists(task_id).await? {
            return Err(KanbanError::task_not_found(task_id));
        }

        if !update.is_empty() {
            let mut tx = self.pool.begin().await?;

            let outcome = async {
                if update.has_field_changes() {
                    tasks::update_task_fields(&mut tx, task_id, update).await?;
                }
                if let Some(tags) = &update.tags {
                    tasks::set_task_tags(&mut tx, task_id, tags).await?;
                }
                Ok::<(), KanbanError>(())
            }
            .await;

            if let Err(e) = outcome {
                crate::log_error!(e, "update_task");
                tx.rollback().await?;
                return Err(e);
            }

            tx.commit().await?;
            crate::log_board_operation!("update_task", task_id);
        }

        self.get_task(task_id).await
    }

    pub async fn delete_task(&self, task_id: &str) -> Result<bool> {
        let deleted = self.tasks().delete(task_id).await?;
        if deleted {
            crate::log_board_operation!("delete_task", task_id);
        }
        Ok(deleted)
    }

    /// Move a task to `column_id`, optionally splicing it in at `new_index`
    /// and rewriting the destination order as `0..n-1`
    pub async fn move_task(
        &self,
        task_id: &str,
        column_id: &str,
        new_index: Option<usize>,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let outcome = async {
            if !tasks::set_task_column(&mut tx, task_id, column_id).await? {
                return Err(KanbanError::task_not_found(task_id));
            }

            if let Some(index) = new_index {
                let current = tasks::task_ids_in_column(&mut tx, column_id).await?;
                let reordered = splice_into(current, task_id, index);
                tasks::apply_task_order(&mut tx, &dense_order(&reordered)).await?;
            }
            Ok::<(), KanbanError>(())
        }
        .await;

        if let Err(e) = outcome {
            if !e.is_not_found() {
                crate::log_error!(e, "move_task");
            }
            tx.rollback().await?;
            return Err(e);
        }

        tx.commit().await?;
        crate::log_board_operation!("move_task", task_id, column_id);
        Ok(())
    }

    /// Rewrite the order of a column's tasks as `0..n-1` in list order
    pub async fn reorder_tasks(&self, column_id: &str, task_ids: &[String]) -> Result<()> {
        self.tasks().update_order(&dense_order(task_ids)).await?;
        crate::log_board_operation!("reorder_tasks", column_id, task_ids.len());
        Ok(())
    }

    pub async fn search_tasks(&self, project_id: &str, term: &str) -> Result<Vec<SearchResult>> {
        if !self.projects().exists(project_id).await? {
            return Err(KanbanError::project_not_found(project_id));
        }

        self.tasks().search(project_id, term).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Priority;
    use crate::test_utils::test_helpers::TestContext;

    async fn board(service: &BoardService<'_>) -> ProjectWithColumns {
        service
            .create_project_with_defaults("Board", Some("test board"))
            .await
            .unwrap()
    }

    fn column_task_ids(tree: &ProjectWithColumns, column_id: &str) -> Vec<String> {
        tree.columns
            .iter()
            .find(|c| c.column.id == column_id)
            .map(|c| c.tasks.iter().map(|t| t.id.clone()).collect())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_create_project_seeds_default_columns() {
        let ctx = TestContext::new().await;
        let service = BoardService::new(ctx.pool());

        let created = board(&service).await;

        let titles: Vec<&str> = created
            .columns
            .iter()
            .map(|c| c.column.title.as_str())
            .collect();
        let orders: Vec<i64> = created.columns.iter().map(|c| c.column.order_index).collect();
        assert_eq!(titles, vec!["To Do", "In Progress", "Done"]);
        assert_eq!(orders, vec![1, 2, 3]);
        assert!(created.columns.iter().all(|c| c.tasks.is_empty()));

        let fetched = service
            .get_project_with_columns(&created.project.id)
            .await
            .unwrap();
        assert_eq!(fetched.columns.len(), 3);
        assert_eq!(fetched.project.description.as_deref(), Some("test board"));
    }

    #[tokio::test]
    async fn test_get_project_with_columns_not_found() {
        let ctx = TestContext::new().await;
        let service = BoardService::new(ctx.pool());

        let err = service.get_project_with_columns("ghost").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_project_tree_composes_tasks_and_tags() {
        let ctx = TestContext::new().await;
        let service = BoardService::new(ctx.pool());
        let created = board(&service).await;
        let todo = &created.columns[0].column.id;
        let done = &created.columns[2].column.id;

        let tagged = service
            .create_task(
                todo,
                &NewTask {
                    tags: vec!["ui".into(), "bug".into()],
                    ..NewTask::titled("Fix header")
                },
            )
            .await
            .unwrap();
        let plain = service
            .create_task(todo, &NewTask::titled("Write tests"))
            .await
            .unwrap();
        let finished = service
            .create_task(done, &NewTask::titled("Setup CI"))
            .await
            .unwrap();

        let tree = service
            .get_project_with_columns(&created.project.id)
            .await
            .unwrap();

        assert_eq!(column_task_ids(&tree, todo), vec![tagged.id.clone(), plain.id]);
        assert_eq!(column_task_ids(&tree, done), vec![finished.id]);
        assert_eq!(tree.columns[0].tasks[0].tags, vec!["ui", "bug"]);
        assert!(tree.columns[0].tasks[1].tags.is_empty());
        assert!(tree.columns[1].tasks.is_empty());
    }

    #[tokio::test]
    async fn test_create_column_appends_after_seeded() {
        let ctx = TestContext::new().await;
        let service = BoardService::new(ctx.pool());
        let created = board(&service).await;

        let column = service
            .create_column(&created.project.id, "Blocked", Some("#ef4444"))
            .await
            .unwrap();
        assert_eq!(column.order_index, 4);

        let err = service.create_column("ghost", "x", None).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_create_task_in_missing_column() {
        let ctx = TestContext::new().await;
        let service = BoardService::new(ctx.pool());

        let err = service
            .create_task("ghost", &NewTask::titled("x"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_task_fields_and_tags() {
        let ctx = TestContext::new().await;
        let service = BoardService::new(ctx.pool());
        let created = board(&service).await;
        let task = service
            .create_task(
                &created.columns[0].column.id,
                &NewTask {
                    tags: vec!["old".into()],
                    ..NewTask::titled("Task")
                },
            )
            .await
            .unwrap();

        let update = TaskUpdate {
            title: Some("Renamed".into()),
            priority: Some(Priority::Low),
            tags: Some(vec!["new".into(), "shiny".into()]),
            ..Default::default()
        };
        let updated = service.update_task(&task.id, &update).await.unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.priority, Priority::Low);
        assert_eq!(updated.tags, vec!["new", "shiny"]);
    }

    #[tokio::test]
    async fn test_update_task_empty_tags_clears_idempotently() {
        let ctx = TestContext::new().await;
        let service = BoardService::new(ctx.pool());
        let created = board(&service).await;
        let task = service
            .create_task(
                &created.columns[0].column.id,
                &NewTask {
                    tags: vec!["a".into(), "b".into()],
                    ..NewTask::titled("Task")
                },
            )
            .await
            .unwrap();

        let clear = TaskUpdate {
            tags: Some(Vec::new()),
            ..Default::default()
        };
        for _ in 0..2 {
            let updated = service.update_task(&task.id, &clear).await.unwrap();
            assert!(updated.tags.is_empty());
            assert_eq!(ctx.count_where("task_tags", "task_id", &task.id).await, 0);
        }
        assert_eq!(service.get_task(&task.id).await.unwrap().title, "Task");
    }

    #[tokio::test]
    async fn test_update_missing_task() {
        let ctx = TestContext::new().await;
        let service = BoardService::new(ctx.pool());

        let err = service
            .update_task("ghost", &TaskUpdate::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_move_task_to_front_of_other_column() {
        let ctx = TestContext::new().await;
        let service = BoardService::new(ctx.pool());
        let created = board(&service).await;
        let todo = created.columns[0].column.id.clone();
        let doing = created.columns[1].column.id.clone();

        let moving = service
            .create_task(&todo, &NewTask::titled("moving"))
            .await
            .unwrap();
        let d1 = service
            .create_task(&doing, &NewTask::titled("d1"))
            .await
            .unwrap();
        let d2 = service
            .create_task(&doing, &NewTask::titled("d2"))
            .await
            .unwrap();

        service.move_task(&moving.id, &doing, Some(0)).await.unwrap();

        let tasks = TaskRepository::new(ctx.pool())
            .list_by_column(&doing)
            .await
            .unwrap();
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        let orders: Vec<i64> = tasks.iter().map(|t| t.order_index).collect();
        assert_eq!(ids, vec![moving.id.as_str(), d1.id.as_str(), d2.id.as_str()]);
        assert_eq!(orders, vec![0, 1, 2]);
        assert_eq!(service.get_task(&moving.id).await.unwrap().column_id, doing);
    }

    #[tokio::test]
    async fn test_move_task_within_column_and_past_end() {
        let ctx = TestContext::new().await;
        let service = BoardService::new(ctx.pool());
        let created = board(&service).await;
        let todo = created.columns[0].column.id.clone();

        let a = service.create_task(&todo, &NewTask::titled("a")).await.unwrap();
        let b = service.create_task(&todo, &NewTask::titled("b")).await.unwrap();
        let c = service.create_task(&todo, &NewTask::titled("c")).await.unwrap();

        service.move_task(&a.id, &todo, Some(10)).await.unwrap();

        let tree = service
            .get_project_with_columns(&created.project.id)
            .await
            .unwrap();
        assert_eq!(column_task_ids(&tree, &todo), vec![b.id, c.id, a.id]);
    }

    #[tokio::test]
    async fn test_move_task_without_index_keeps_order_value() {
        let ctx = TestContext::new().await;
        let service = BoardService::new(ctx.pool());
        let created = board(&service).await;
        let todo = created.columns[0].column.id.clone();
        let done = created.columns[2].column.id.clone();

        service.create_task(&todo, &NewTask::titled("a")).await.unwrap();
        let b = service.create_task(&todo, &NewTask::titled("b")).await.unwrap();

        service.move_task(&b.id, &done, None).await.unwrap();

        let moved = service.get_task(&b.id).await.unwrap();
        assert_eq!(moved.column_id, done);
        assert_eq!(moved.order_index, 1);
    }

    #[tokio::test]
    async fn test_move_missing_task_or_column() {
        let ctx = TestContext::new().await;
        let service = BoardService::new(ctx.pool());
        let created = board(&service).await;
        let todo = created.columns[0].column.id.clone();

        let err = service.move_task("ghost", &todo, Some(0)).await.unwrap_err();
        assert!(err.is_not_found());

        let task = service.create_task(&todo, &NewTask::titled("t")).await.unwrap();
        let err = service
            .move_task(&task.id, "no-such-column", None)
            .await
            .unwrap_err();
        assert!(matches!(err, KanbanError::DatabaseError(_)));
        assert_eq!(service.get_task(&task.id).await.unwrap().column_id, todo);
    }

    #[tokio::test]
    async fn test_reorder_tasks() {
        let ctx = TestContext::new().await;
        let service = BoardService::new(ctx.pool());
        let created = board(&service).await;
        let todo = created.columns[0].column.id.clone();

        let t1 = service.create_task(&todo, &NewTask::titled("1")).await.unwrap();
        let t2 = service.create_task(&todo, &NewTask::titled("2")).await.unwrap();
        let t3 = service.create_task(&todo, &NewTask::titled("3")).await.unwrap();

        service
            .reorder_tasks(&todo, &[t3.id.clone(), t1.id.clone(), t2.id.clone()])
            .await
            .unwrap();

        let tree = service
            .get_project_with_columns(&created.project.id)
            .await
            .unwrap();
        assert_eq!(column_task_ids(&tree, &todo), vec![t3.id, t1.id, t2.id]);
        let orders: Vec<i64> = tree.columns[0].tasks.iter().map(|t| t.order_index).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_reorder_columns() {
        let ctx = TestContext::new().await;
        let service = BoardService::new(ctx.pool());
        let created = board(&service).await;
        let ids: Vec<String> = created
            .columns
            .iter()
            .rev()
            .map(|c| c.column.id.clone())
            .collect();

        service
            .reorder_columns(&created.project.id, &ids)
            .await
            .unwrap();

        let tree = service
            .get_project_with_columns(&created.project.id)
            .await
            .unwrap();
        let titles: Vec<&str> = tree.columns.iter().map(|c| c.column.title.as_str()).collect();
        assert_eq!(titles, vec!["Done", "In Progress", "To Do"]);
    }

    #[tokio::test]
    async fn test_delete_project_cascades() {
        let ctx = TestContext::new().await;
        let service = BoardService::new(ctx.pool());
        let created = board(&service).await;
        let project_id = created.project.id.clone();

        let mut task_ids = Vec::new();
        for column in &created.columns {
            let task = service
                .create_task(
                    &column.column.id,
                    &NewTask {
                        tags: vec!["x".into()],
                        ..NewTask::titled("t")
                    },
                )
                .await
                .unwrap();
            task_ids.push(task.id);
        }

        assert!(service.delete_project(&project_id).await.unwrap());

        assert_eq!(ctx.count_where("columns", "project_id", &project_id).await, 0);
        for column in &created.columns {
            assert_eq!(ctx.count_where("tasks", "column_id", &column.column.id).await, 0);
        }
        for id in &task_ids {
            assert_eq!(ctx.count_where("task_tags", "task_id", id).await, 0);
        }
        assert!(!service.delete_project(&project_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_projects_counts() {
        let ctx = TestContext::new().await;
        let service = BoardService::new(ctx.pool());
        let created = board(&service).await;
        service
            .create_task(&created.columns[0].column.id, &NewTask::titled("t1"))
            .await
            .unwrap();
        service
            .create_task(&created.columns[1].column.id, &NewTask::titled("t2"))
            .await
            .unwrap();

        let projects = service.list_projects().await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].columns_count, 3);
        assert_eq!(projects[0].tasks_count, 2);
    }

    #[tokio::test]
    async fn test_search_requires_project() {
        let ctx = TestContext::new().await;
        let service = BoardService::new(ctx.pool());

        let err = service.search_tasks("ghost", "x").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
