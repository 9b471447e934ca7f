//! Memory store merging.
//!
//! Folds newly extracted memories into an existing store's list with
//! left-biased upsert semantics: identity is (workspace, project,
//! content), and a match only refreshes `updated_at` and unions files
//! and tags. No other field of an existing memory is ever overwritten,
//! so hand-curated edits on old entries survive re-syncs.

use crate::types::Memory;
use chrono::{DateTime, Utc};

/// Merges `incoming` memories into `existing`.
///
/// Matched memories are updated in place; unmatched ones are appended
/// in arrival order.
pub fn merge_memories(
    mut existing: Vec<Memory>,
    incoming: Vec<Memory>,
    now: DateTime<Utc>,
) -> Vec<Memory> {
    for new_memory in incoming {
        match existing
            .iter_mut()
            .find(|m| m.identity() == new_memory.identity())
        {
            Some(found) => {
                found.metadata.updated_at = now;
                found.metadata.files =
                    union_preserving(&found.metadata.files, &new_memory.metadata.files);
                found.metadata.tags =
                    union_preserving(&found.metadata.tags, &new_memory.metadata.tags);
            }
            None => existing.push(new_memory),
        }
    }
    existing
}

/// Set union that preserves first-seen order, keeping output stable
/// across repeated merges.
fn union_preserving(a: &[String], b: &[String]) -> Vec<String> {
    let mut union = a.to_vec();
    for item in b {
        if !union.contains(item) {
            union.push(item.clone());
        }
    }
    union
}
