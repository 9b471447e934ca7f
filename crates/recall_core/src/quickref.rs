//! Quick reference building.
//!
//! The quick reference is a materialized, read-optimized view over a
//! store's memories plus sub-scope enumeration. It holds no information
//! not present elsewhere and is fully recomputed on every update —
//! never incrementally patched — so it cannot drift from the memory
//! list it was built from.

use crate::config::{LimitsConfig, RetentionConfig};
use crate::types::{
    ActiveScope, Memory, MemoryStatus, NavLinks, ProjectLink, QuickReference, RecentFile,
    RecentMemory, WorkspaceLink,
};
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use std::collections::HashMap;

/// Activity summary for one workspace, from sub-scope enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeActivity {
    /// Project names under the workspace.
    pub projects: Vec<String>,
    /// Most recent modification across the workspace's projects.
    pub last_activity: DateTime<Utc>,
}

/// Root-relative location of a workspace's store artifact.
pub fn workspace_store_rel_path(workspace: &str) -> String {
    format!("workspaces/{}/context.json", workspace)
}

/// Root-relative location of a project's context artifact.
pub fn project_context_rel_path(workspace: &str, project: &str) -> String {
    format!("workspaces/{}/projects/{}/project_context.json", workspace, project)
}

/// Rebuilds a quick reference from a memory list and the workspace
/// activity map. Pure and deterministic: the same inputs always yield
/// byte-identical output.
pub fn build_quick_reference(
    memories: &[Memory],
    scopes: &BTreeMap<String, ScopeActivity>,
    now: DateTime<Utc>,
    retention: &RetentionConfig,
    limits: &LimitsConfig,
) -> QuickReference {
    QuickReference {
        recent_memories: recent_memories(memories, limits.recent_memories),
        active_scopes: active_scopes(scopes, now, retention.active_window_days),
        recent_files: recent_files(memories, limits.recent_files),
        recent_tags: ranked_tags(memories, now, retention.tag_window_days, limits.recent_tags),
        links: nav_links(scopes),
    }
}

/// Most-recently-updated active memories, most recent first.
fn recent_memories(memories: &[Memory], limit: usize) -> Vec<RecentMemory> {
    let mut active: Vec<&Memory> = memories
        .iter()
        .filter(|m| m.metadata.status == MemoryStatus::Active)
        .collect();
    // Stable sort: equal timestamps keep store order.
    active.sort_by(|a, b| b.metadata.updated_at.cmp(&a.metadata.updated_at));
    active
        .into_iter()
        .take(limit)
        .map(|m| RecentMemory {
            id: m.id.to_string(),
            content: m.content.clone(),
            workspace: m.metadata.workspace.clone(),
            project: m.metadata.project.clone(),
            updated_at: m.metadata.updated_at,
        })
        .collect()
}

/// Workspaces with activity inside the window, in name order.
fn active_scopes(
    scopes: &BTreeMap<String, ScopeActivity>,
    now: DateTime<Utc>,
    window_days: u32,
) -> Vec<ActiveScope> {
    let cutoff = now - Duration::days(i64::from(window_days));
    scopes
        .iter()
        .filter(|(_, activity)| activity.last_activity >= cutoff)
        .map(|(name, activity)| ActiveScope {
            name: name.clone(),
            active_projects: activity.projects.clone(),
            last_activity: activity.last_activity,
        })
        .collect()
}

/// Files referenced by memories, first occurrence wins, in memory order.
fn recent_files(memories: &[Memory], limit: usize) -> Vec<RecentFile> {
    let mut seen: Vec<RecentFile> = Vec::new();
    for memory in memories {
        for path in &memory.metadata.files {
            if seen.len() >= limit {
                return seen;
            }
            if !seen.iter().any(|f| &f.path == path) {
                seen.push(RecentFile {
                    path: path.clone(),
                    workspace: memory.metadata.workspace.clone(),
                    project: memory.metadata.project.clone(),
                    last_modified: memory.metadata.updated_at,
                });
            }
        }
    }
    seen
}

/// Tags ranked by occurrence count across memories updated within the
/// window; ties break by first-seen order.
fn ranked_tags(
    memories: &[Memory],
    now: DateTime<Utc>,
    window_days: u32,
    limit: usize,
) -> Vec<String> {
    let cutoff = now - Duration::days(i64::from(window_days));
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();

    for memory in memories {
        if memory.metadata.updated_at < cutoff {
            continue;
        }
        for tag in &memory.metadata.tags {
            let entry = counts.entry(tag.as_str()).or_insert(0);
            *entry += 1;
            if *entry == 1 {
                first_seen.push(tag.as_str());
            }
        }
    }

    let mut ranked: Vec<(usize, &str)> = first_seen
        .iter()
        .enumerate()
        .map(|(index, tag)| (index, *tag))
        .collect();
    ranked.sort_by(|(ia, a), (ib, b)| counts[b].cmp(&counts[a]).then(ia.cmp(ib)));
    ranked
        .into_iter()
        .take(limit)
        .map(|(_, tag)| tag.to_string())
        .collect()
}

/// Navigation table: every known workspace and project, keyed by scope
/// path, pointing at its store artifact.
fn nav_links(scopes: &BTreeMap<String, ScopeActivity>) -> NavLinks {
    let mut links = NavLinks::default();
    for (workspace, activity) in scopes {
        links.workspaces.insert(
            workspace.clone(),
            WorkspaceLink {
                context_path: workspace_store_rel_path(workspace),
                active_projects: activity.projects.len(),
            },
        );
        for project in &activity.projects {
            links.projects.insert(
                format!("{}/{}", workspace, project),
                ProjectLink {
                    workspace: workspace.clone(),
                    path: format!("workspaces/{}/projects/{}/", workspace, project),
                    context_path: project_context_rel_path(workspace, project),
                },
            );
        }
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MemoryMetadata, Relevance};
    use chrono::TimeZone;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap()
    }

    fn memory(content: &str, updated: DateTime<Utc>, tags: &[&str], files: &[&str]) -> Memory {
        Memory {
            id: Uuid::new_v4(),
            content: content.into(),
            metadata: MemoryMetadata {
                workspace: Some("acme".into()),
                project: Some("launch".into()),
                files: files.iter().map(|s| s.to_string()).collect(),
                tags: tags.iter().map(|s| s.to_string()).collect(),
                created_at: updated,
                updated_at: updated,
                relevance: Relevance::Medium,
                status: MemoryStatus::Active,
            },
        }
    }

    fn scopes() -> BTreeMap<String, ScopeActivity> {
        let mut map = BTreeMap::new();
        map.insert(
            "acme".to_string(),
            ScopeActivity {
                projects: vec!["launch".into()],
                last_activity: now() - Duration::days(1),
            },
        );
        map.insert(
            "dormant".to_string(),
            ScopeActivity {
                projects: vec!["old".into()],
                last_activity: now() - Duration::days(60),
            },
        );
        map
    }

    #[test]
    fn recent_memories_sorted_and_bounded() {
        let memories: Vec<Memory> = (0..30)
            .map(|i| memory(&format!("m{}", i), now() - Duration::hours(i), &[], &[]))
            .collect();
        let qr = build_quick_reference(
            &memories,
            &scopes(),
            now(),
            &RetentionConfig::default(),
            &LimitsConfig::default(),
        );
        assert_eq!(qr.recent_memories.len(), 20);
        assert_eq!(qr.recent_memories[0].content, "m0");
        assert_eq!(qr.recent_memories[19].content, "m19");
    }

    #[test]
    fn archived_memories_never_surface() {
        let mut archived = memory("hidden", now(), &[], &[]);
        archived.metadata.status = MemoryStatus::Archived;
        let qr = build_quick_reference(
            &[archived],
            &scopes(),
            now(),
            &RetentionConfig::default(),
            &LimitsConfig::default(),
        );
        assert!(qr.recent_memories.is_empty());
    }

    #[test]
    fn only_recently_active_scopes_listed() {
        let qr = build_quick_reference(
            &[],
            &scopes(),
            now(),
            &RetentionConfig::default(),
            &LimitsConfig::default(),
        );
        assert_eq!(qr.active_scopes.len(), 1);
        assert_eq!(qr.active_scopes[0].name, "acme");
        // Navigation covers dormant scopes too.
        assert!(qr.links.workspaces.contains_key("dormant"));
        assert!(qr.links.projects.contains_key("dormant/old"));
    }

    #[test]
    fn tags_ranked_by_count_then_first_seen() {
        let memories = vec![
            memory("a", now(), &["decision", "task"], &[]),
            memory("b", now(), &["task"], &[]),
            memory("c", now(), &["blocker"], &[]),
            // Outside the 30-day window: ignored for ranking.
            memory("d", now() - Duration::days(45), &["stale-tag"], &[]),
        ];
        let qr = build_quick_reference(
            &memories,
            &scopes(),
            now(),
            &RetentionConfig::default(),
            &LimitsConfig::default(),
        );
        assert_eq!(qr.recent_tags, vec!["task", "decision", "blocker"]);
    }

    #[test]
    fn files_first_seen_wins() {
        let memories = vec![
            memory("a", now(), &[], &["tasks.md", "status.md"]),
            memory("b", now() - Duration::hours(1), &[], &["tasks.md"]),
        ];
        let qr = build_quick_reference(
            &memories,
            &scopes(),
            now(),
            &RetentionConfig::default(),
            &LimitsConfig::default(),
        );
        assert_eq!(qr.recent_files.len(), 2);
        assert_eq!(qr.recent_files[0].path, "tasks.md");
        assert_eq!(qr.recent_files[0].last_modified, now());
    }

    #[test]
    fn rebuild_is_idempotent() {
        let memories = vec![
            memory("a", now(), &["task"], &["tasks.md"]),
            memory("b", now() - Duration::hours(2), &["decision"], &["status.md"]),
        ];
        let first = build_quick_reference(
            &memories,
            &scopes(),
            now(),
            &RetentionConfig::default(),
            &LimitsConfig::default(),
        );
        let second = build_quick_reference(
            &memories,
            &scopes(),
            now(),
            &RetentionConfig::default(),
            &LimitsConfig::default(),
        );
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
