//! SQL query constants and fragments
//!
//! Column lists and base SELECT statements shared by the repository, so that
//! every read of a given entity decodes into the same struct.
//!
//! Note: WHERE clauses and partial-update SET lists are built inline.

// ============================================================================
// Project Queries
// ============================================================================

pub const PROJECT_COLUMNS: &str = "id, name, description, created_at";

pub const SELECT_PROJECT: &str = const_format::formatcp!("SELECT {} FROM projects", PROJECT_COLUMNS);

/// Projects with derived column and task counts, newest first
pub const SELECT_PROJECT_SUMMARIES: &str = r#"
    SELECT p.id, p.name, p.description, p.created_at,
           (SELECT COUNT(*) FROM columns c WHERE c.project_id = p.id) AS columns_count,
           (SELECT COUNT(*) FROM tasks t
              JOIN columns c ON t.column_id = c.id
             WHERE c.project_id = p.id) AS tasks_count
    FROM projects p
    ORDER BY p.created_at DESC, p.rowid DESC
"#;

// ============================================================================
// Column Queries
// ============================================================================

pub const COLUMN_COLUMNS: &str = "id, project_id, title, color, order_index";

pub const SELECT_COLUMN: &str = const_format::formatcp!("SELECT {} FROM columns", COLUMN_COLUMNS);

/// Insert at `max + 1` within the project; the order is computed by the
/// writing statement itself so no read precedes the write lock
pub const APPEND_COLUMN: &str = r#"
    INSERT INTO columns (id, project_id, title, color, order_index)
    SELECT ?1, ?2, ?3, ?4, COALESCE(MAX(order_index), -1) + 1
    FROM columns WHERE project_id = ?2
    RETURNING order_index
"#;

// ============================================================================
// Task Queries
// ============================================================================

/// Task columns qualified with the `t` alias
pub const TASK_COLUMNS: &str =
    "t.id, t.column_id, t.title, t.description, t.assignee, t.due_date, t.priority, t.created_at, t.order_index";

pub const SELECT_TASK: &str = const_format::formatcp!("SELECT {} FROM tasks t", TASK_COLUMNS);

/// Display order of tasks inside a column
pub const TASK_ORDER: &str = "t.order_index ASC, t.created_at ASC, t.rowid ASC";

/// Insert at `max + 1` within the column, in a single statement
pub const APPEND_TASK: &str = r#"
    INSERT INTO tasks (id, column_id, title, description, assignee, due_date, priority, created_at, order_index)
    SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, COALESCE(MAX(order_index), -1) + 1
    FROM tasks WHERE column_id = ?2
    RETURNING order_index
"#;

// ============================================================================
// Tag Queries
// ============================================================================

pub const SELECT_TAGS_FOR_TASK: &str =
    "SELECT tag_name FROM task_tags WHERE task_id = ? ORDER BY rowid ASC";

pub const INSERT_TAG: &str = "INSERT OR IGNORE INTO task_tags (task_id, tag_name) VALUES (?, ?)";

pub const DELETE_TAGS_FOR_TASK: &str = "DELETE FROM task_tags WHERE task_id = ?";

// ============================================================================
// Existence Checks
// ============================================================================

pub const CHECK_PROJECT_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM projects WHERE id = ?)";

pub const CHECK_COLUMN_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM columns WHERE id = ?)";

pub const CHECK_TASK_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM tasks WHERE id = ?)";
