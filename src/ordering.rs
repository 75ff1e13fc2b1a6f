//! Sibling ordering for columns and tasks.
//!
//! Persisted `order_index` values may be sparse or duplicated between
//! reorders. Every reorder rewrites the whole sibling set as a dense
//! `0..n-1` sequence computed here.

use crate::db::models::OrderEntry;

/// Assign `order = position` to every id, in list order
pub fn dense_order<S: AsRef<str>>(ids: &[S]) -> Vec<OrderEntry> {
    ids.iter()
        .enumerate()
        .map(|(position, id)| OrderEntry {
            id: id.as_ref().to_string(),
            order: position as i64,
        })
        .collect()
}

/// Remove `moved` from `current` (if present) and insert it at `index`.
///
/// An index past the end appends.
pub fn splice_into(mut current: Vec<String>, moved: &str, index: usize) -> Vec<String> {
    current.retain(|id| id != moved);
    let at = index.min(current.len());
    current.insert(at, moved.to_string());
    current
}
