pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod ids;
pub mod logging;
pub mod ordering;
pub mod repository;
pub mod server;
pub mod service;
pub mod sql_constants;

#[cfg(test)]
pub mod test_utils;

pub use db::models::{
    Column, ColumnUpdate, ColumnWithTasks, NewTask, OrderEntry, Priority, Project,
    ProjectSummary, ProjectUpdate, ProjectWithColumns, SearchResult, Task, TaskUpdate,
};
pub use error::{KanbanError, Result};
pub use service::BoardService;
