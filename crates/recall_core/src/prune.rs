//! Obsolescence pruning.
//!
//! The only path by which a memory disappears: archived memories past
//! the archived retention window and low-relevance memories past the
//! low-relevance window are dropped after each merge. Everything else
//! is retained indefinitely.

use crate::config::RetentionConfig;
use crate::types::{Memory, MemoryStatus, Relevance};
use chrono::{DateTime, Duration, Utc};

/// Removes obsolete memories. Returns the surviving list and the number
/// removed. A memory updated exactly at a cutoff is retained; it has to
/// be strictly older to go.
pub fn prune_memories(
    memories: Vec<Memory>,
    now: DateTime<Utc>,
    retention: &RetentionConfig,
) -> (Vec<Memory>, usize) {
    let archived_cutoff = now - Duration::days(i64::from(retention.archived_days));
    let low_cutoff = now - Duration::days(i64::from(retention.low_relevance_days));

    let before = memories.len();
    let kept: Vec<Memory> = memories
        .into_iter()
        .filter(|memory| {
            let updated = memory.metadata.updated_at;
            if memory.metadata.status == MemoryStatus::Archived && updated < archived_cutoff {
                return false;
            }
            if memory.metadata.relevance == Relevance::Low && updated < low_cutoff {
                return false;
            }
            true
        })
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}
