//! Storage access for projects, columns, tasks and tags.
//!
//! Each repository borrows the shared pool. Operations that must join a
//! caller's transaction are exposed as `pub(crate)` functions taking a
//! `&mut SqliteConnection` instead.

pub mod columns;
pub mod projects;
pub mod tasks;

pub use columns::ColumnRepository;
pub use projects::ProjectRepository;
pub use tasks::TaskRepository;

use crate::db::models::Task;
use std::collections::HashMap;

/// Group `(task_id, tag_name)` rows by task, keeping row order
pub(crate) fn group_tags(rows: Vec<(String, String)>) -> HashMap<String, Vec<String>> {
    let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
    for (task_id, tag) in rows {
        grouped.entry(task_id).or_default().push(tag);
    }
    grouped
}

/// Move each task's tag list out of `tags` into the task
pub(crate) fn attach_tags(tasks: &mut [Task], tags: &mut HashMap<String, Vec<String>>) {
    for task in tasks.iter_mut() {
        task.tags = tags.remove(&task.id).unwrap_or_default();
    }
}
