use serde::{Deserialize, Serialize};

use crate::db::models::{ColumnUpdate, NewTask, ProjectUpdate, TaskUpdate};
use crate::error::{KanbanError, Result};

/// Body of every simple success response
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SuccessResponse {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateColumnRequest {
    pub title: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveTaskRequest {
    pub column_id: String,
    #[serde(default)]
    pub new_index: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderTasksRequest {
    pub task_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderColumnsRequest {
    pub column_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(KanbanError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn require_optional_text(field: &str, value: Option<&String>) -> Result<()> {
    match value {
        Some(v) => require_text(field, v),
        None => Ok(()),
    }
}

impl CreateProjectRequest {
    pub fn validate(&self) -> Result<()> {
        require_text("name", &self.name)
    }
}

impl CreateColumnRequest {
    pub fn validate(&self) -> Result<()> {
        require_text("title", &self.title)
    }
}

impl NewTask {
    pub fn validate(&self) -> Result<()> {
        require_text("title", &self.title)
    }
}

impl ProjectUpdate {
    pub fn validate(&self) -> Result<()> {
        require_optional_text("name", self.name.as_ref())
    }
}

impl ColumnUpdate {
    pub fn validate(&self) -> Result<()> {
        require_optional_text("title", self.title.as_ref())
    }
}

impl TaskUpdate {
    pub fn validate(&self) -> Result<()> {
        require_optional_text("title", self.title.as_ref())
    }
}

impl MoveTaskRequest {
    pub fn validate(&self) -> Result<()> {
        require_text("columnId", &self.column_id)
    }
}
