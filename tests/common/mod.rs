//! Common utilities for integration tests

use assert_cmd::Command;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use kanban_board::db::{create_pool, run_migrations};
use kanban_board::server::{create_router, AppState};
use serde_json::Value;
use sqlx::SqlitePool;
use std::path::PathBuf;
use tempfile::TempDir;
use tower::ServiceExt;

/// Path to the `kanban` binary, honoring custom target directories
#[allow(deprecated, dead_code)]
pub fn kanban_binary() -> PathBuf {
    std::env::var("CARGO_BIN_EXE_kanban")
        .map(PathBuf::from)
        .unwrap_or_else(|_| assert_cmd::cargo::cargo_bin("kanban"))
}

/// `kanban` command with configuration variables cleared
#[allow(dead_code)]
pub fn kanban_command() -> Command {
    let mut cmd = Command::new(kanban_binary());
    cmd.env_remove("PORT")
        .env_remove("KANBAN_HOST")
        .env_remove("KANBAN_DB_PATH")
        .env_remove("RUST_LOG");
    cmd
}

/// Fresh database in a temp dir
#[allow(dead_code)]
pub async fn setup_pool() -> (SqlitePool, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let pool = create_pool(&temp_dir.path().join("kanban.db")).await.unwrap();
    run_migrations(&pool).await.unwrap();
    (pool, temp_dir)
}

/// Router over a fresh database, driven in-process with `oneshot`
#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let (pool, temp_dir) = setup_pool().await;
        let router = create_router(AppState {
            db_pool: pool.clone(),
        });
        Self {
            router,
            pool,
            _temp_dir: temp_dir,
        }
    }

    /// Send a request and decode the body: JSON when it parses, otherwise the
    /// raw text as a `Value::String` (Null when empty)
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.dispatch(request).await
    }

    /// Send a JSON-typed request with an arbitrary (possibly malformed) body
    pub async fn send_raw(&self, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }

    /// Create a project and return its id and the ids of its seeded columns
    pub async fn seed_project(&self, name: &str) -> (String, Vec<String>) {
        let (status, body) = self
            .post("/api/projects", serde_json::json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["id"].as_str().unwrap().to_string();
        let columns = body["columns"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["id"].as_str().unwrap().to_string())
            .collect();
        (id, columns)
    }

    /// Create a task and return its id
    pub async fn seed_task(&self, project_id: &str, column_id: &str, title: &str) -> String {
        let (status, body) = self
            .post(
                &format!("/api/projects/{}/columns/{}/tasks", project_id, column_id),
                serde_json::json!({ "title": title }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }
}
