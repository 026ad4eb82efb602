//! Full-scan menu search
//!
//! Cassandra has no text search on non-key columns, so every search loads the
//! whole table and filters in process. Cost is linear in the number of rows.

use shared::models::MenuItem;

use crate::db::{MenuStore, StoreResult};

/// Lower-cased needle, or `None` when the term means "no filter".
///
/// Only whitespace-only terms are treated as empty. Anything else is matched
/// as given, surrounding spaces included.
pub fn normalize_term(term: &str) -> Option<String> {
    if term.trim().is_empty() {
        return None;
    }
    Some(term.to_lowercase())
}

/// Case-insensitive substring match on name, description or category.
///
/// `needle` must already be lower-cased. Null fields never match.
pub fn matches(item: &MenuItem, needle: &str) -> bool {
    item.searchable_fields()
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Keep matching items, in their original order
pub fn filter_items(items: Vec<MenuItem>, term: &str) -> Vec<MenuItem> {
    match normalize_term(term) {
        None => items,
        Some(needle) => items
            .into_iter()
            .filter(|item| matches(item, &needle))
            .collect(),
    }
}

/// Fetch every row and filter by `term`
pub async fn search(store: &dyn MenuStore, term: &str) -> StoreResult<Vec<MenuItem>> {
    let items = store.list_all().await?;
    let total = items.len();
    let found = filter_items(items, term);

    tracing::debug!(term, scanned = total, matched = found.len(), "Menu search");
    Ok(found)
}
