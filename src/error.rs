use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KanbanError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Body returned for every failed request
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl KanbanError {
    pub fn project_not_found(id: impl Into<String>) -> Self {
        KanbanError::NotFound {
            entity: "Project",
            id: id.into(),
        }
    }

    pub fn column_not_found(id: impl Into<String>) -> Self {
        KanbanError::NotFound {
            entity: "Column",
            id: id.into(),
        }
    }

    pub fn task_not_found(id: impl Into<String>) -> Self {
        KanbanError::NotFound {
            entity: "Task",
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, KanbanError::NotFound { .. })
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            KanbanError::NotFound { .. } => StatusCode::NOT_FOUND,
            KanbanError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
        }
    }
}

/// Malformed or mistyped request bodies are client errors
impl From<JsonRejection> for KanbanError {
    fn from(rejection: JsonRejection) -> Self {
        KanbanError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for KanbanError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_error_response())).into_response()
    }
}

pub type Result<T> = std::result::Result<T, KanbanError>;
