use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use super::extract::AppJson;
use super::models::*;
use super::server::AppState;
use crate::db::models::{ColumnUpdate, NewTask, ProjectUpdate, TaskUpdate};
use crate::error::KanbanError;
use crate::service::BoardService;

/// Log unexpected failures with context, then render the `{error}` body
fn failure(context: &str, e: KanbanError) -> Response {
    if e.status_code().is_server_error() {
        tracing::error!("Failed to {}: {}", context, e);
    } else {
        tracing::debug!("Rejected {}: {}", context, e);
    }
    e.into_response()
}

fn not_found(message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(crate::error::ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Projects
// ============================================================================

/// List projects with column and task counts
pub async fn list_projects(State(state): State<AppState>) -> impl IntoResponse {
    let service = BoardService::new(&state.db_pool);

    match service.list_projects().await {
        Ok(projects) => (StatusCode::OK, Json(projects)).into_response(),
        Err(e) => failure("list projects", e),
    }
}

/// Full project tree: columns, tasks and tags
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let service = BoardService::new(&state.db_pool);

    match service.get_project_with_columns(&id).await {
        Ok(project) => (StatusCode::OK, Json(project)).into_response(),
        Err(e) => failure("get project", e),
    }
}

/// Create a project with its default columns
pub async fn create_project(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateProjectRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return failure("create project", e);
    }

    let service = BoardService::new(&state.db_pool);

    match service
        .create_project_with_defaults(&req.name, req.description.as_deref())
        .await
    {
        Ok(project) => (StatusCode::CREATED, Json(project)).into_response(),
        Err(e) => failure("create project", e),
    }
}

pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(update): AppJson<ProjectUpdate>,
) -> impl IntoResponse {
    if let Err(e) = update.validate() {
        return failure("update project", e);
    }

    let service = BoardService::new(&state.db_pool);

    match service.update_project(&id, &update).await {
        Ok(true) => Json(SuccessResponse::with_message("Project updated")).into_response(),
        Ok(false) => not_found("Project not found"),
        Err(e) => failure("update project", e),
    }
}

pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let service = BoardService::new(&state.db_pool);

    match service.delete_project(&id).await {
        Ok(true) => Json(SuccessResponse::with_message("Project deleted")).into_response(),
        Ok(false) => not_found("Project not found"),
        Err(e) => failure("delete project", e),
    }
}

// ============================================================================
// Columns
// ============================================================================

pub async fn create_column(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    AppJson(req): AppJson<CreateColumnRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return failure("create column", e);
    }

    let service = BoardService::new(&state.db_pool);

    match service
        .create_column(&project_id, &req.title, req.color.as_deref())
        .await
    {
        Ok(column) => (StatusCode::CREATED, Json(column)).into_response(),
        Err(e) => failure("create column", e),
    }
}

pub async fn update_column(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(update): AppJson<ColumnUpdate>,
) -> impl IntoResponse {
    if let Err(e) = update.validate() {
        return failure("update column", e);
    }

    let service = BoardService::new(&state.db_pool);

    match service.update_column(&id, &update).await {
        Ok(true) => Json(SuccessResponse::with_message("Column updated")).into_response(),
        Ok(false) => not_found("Column not found"),
        Err(e) => failure("update column", e),
    }
}

pub async fn delete_column(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let service = BoardService::new(&state.db_pool);

    match service.delete_column(&id).await {
        Ok(true) => Json(SuccessResponse::with_message("Column deleted")).into_response(),
        Ok(false) => not_found("Column not found"),
        Err(e) => failure("delete column", e),
    }
}

pub async fn reorder_columns(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    AppJson(req): AppJson<ReorderColumnsRequest>,
) -> impl IntoResponse {
    let service = BoardService::new(&state.db_pool);

    match service.reorder_columns(&project_id, &req.column_ids).await {
        Ok(()) => Json(SuccessResponse::with_message("Columns reordered")).into_response(),
        Err(e) => failure("reorder columns", e),
    }
}

// ============================================================================
// Tasks
// ============================================================================

/// Create a task at the end of a column of the given project
pub async fn create_task(
    State(state): State<AppState>,
    Path((project_id, column_id)): Path<(String, String)>,
    AppJson(data): AppJson<NewTask>,
) -> impl IntoResponse {
    if let Err(e) = data.validate() {
        return failure("create task", e);
    }

    let service = BoardService::new(&state.db_pool);

    match service.get_column(&column_id).await {
        Ok(column) if column.project_id == project_id => {},
        Ok(_) => return failure("create task", KanbanError::column_not_found(column_id)),
        Err(e) => return failure("create task", e),
    }

    match service.create_task(&column_id, &data).await {
        Ok(task) => (StatusCode::CREATED, Json(task)).into_response(),
        Err(e) => failure("create task", e),
    }
}

pub async fn get_task(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let service = BoardService::new(&state.db_pool);

    match service.get_task(&id).await {
        Ok(task) => (StatusCode::OK, Json(task)).into_response(),
        Err(e) => failure("get task", e),
    }
}

/// Partial task update; a `tags` key replaces every tag
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(update): AppJson<TaskUpdate>,
) -> impl IntoResponse {
    if let Err(e) = update.validate() {
        return failure("update task", e);
    }

    let service = BoardService::new(&state.db_pool);

    match service.update_task(&id, &update).await {
        Ok(_) => Json(SuccessResponse::with_message("Task updated")).into_response(),
        Err(e) => failure("update task", e),
    }
}

pub async fn move_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<MoveTaskRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return failure("move task", e);
    }

    let service = BoardService::new(&state.db_pool);

    match service.move_task(&id, &req.column_id, req.new_index).await {
        Ok(()) => Json(SuccessResponse::with_message("Task moved")).into_response(),
        Err(e) => failure("move task", e),
    }
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let service = BoardService::new(&state.db_pool);

    match service.delete_task(&id).await {
        Ok(true) => Json(SuccessResponse::with_message("Task deleted")).into_response(),
        Ok(false) => not_found("Task not found"),
        Err(e) => failure("delete task", e),
    }
}

pub async fn reorder_tasks(
    State(state): State<AppState>,
    Path(column_id): Path<String>,
    AppJson(req): AppJson<ReorderTasksRequest>,
) -> impl IntoResponse {
    let service = BoardService::new(&state.db_pool);

    match service.reorder_tasks(&column_id, &req.task_ids).await {
        Ok(()) => Json(SuccessResponse::with_message("Tasks reordered")).into_response(),
        Err(e) => failure("reorder tasks", e),
    }
}

/// Substring search over a project's tasks
pub async fn search_tasks(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let Some(term) = query.q.filter(|q| !q.trim().is_empty()) else {
        return failure(
            "search tasks",
            KanbanError::InvalidInput("query parameter 'q' is required".to_string()),
        );
    };

    let service = BoardService::new(&state.db_pool);

    match service.search_tasks(&project_id, &term).await {
        Ok(results) => (StatusCode::OK, Json(results)).into_response(),
        Err(e) => failure("search tasks", e),
    }
}
