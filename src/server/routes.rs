use axum::{
    routing::{get, patch, post, put},
    Router,
};

use super::handlers;
use super::server::AppState;

/// Board API, mounted under `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Projects
        .route(
            "/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route(
            "/projects/:id",
            get(handlers::get_project)
                .put(handlers::update_project)
                .delete(handlers::delete_project),
        )
        .route("/projects/:id/columns", post(handlers::create_column))
        .route("/projects/:id/column-order", patch(handlers::reorder_columns))
        .route(
            "/projects/:id/columns/:column_id/tasks",
            post(handlers::create_task),
        )
        .route("/projects/:id/search", get(handlers::search_tasks))
        // Columns
        .route(
            "/columns/:id",
            put(handlers::update_column).delete(handlers::delete_column),
        )
        .route("/columns/:id/tasks/reorder", patch(handlers::reorder_tasks))
        // Tasks
        .route(
            "/tasks/:id",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/tasks/:id/move", patch(handlers::move_task))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_routes_creation() {
        let _router = api_routes();
    }
}
