//! Sync orchestration.
//!
//! One `run` is a single pass over the knowledge root: per-project
//! parse → annotate → aggregate → persist → extract, then a serialized
//! merge into the user-level memory pool, pruning, and regeneration of
//! every affected workspace store plus the user store. Project failures
//! are captured per project and never abort the pass; store persistence
//! failures are reported as hard errors without rolling back siblings.

use crate::aggregate::aggregate_project;
use crate::clock::Clock;
use crate::config::Config;
use crate::error::Result;
use crate::extract::{extract_note_memories, extract_project_memories};
use crate::merge::merge_memories;
use crate::parse::{parse_note, parse_plan, parse_status, parse_tasks};
use crate::prune::prune_memories;
use crate::quickref::{build_quick_reference, ScopeActivity};
use crate::store::Layout;
use crate::types::{
    DocKind, Memory, ProjectId, ProjectStatus, ScopeKind, ScopeStore, StoreSummary,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Scope filters for a sync pass.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Restrict the pass to one workspace.
    pub workspace: Option<String>,
    /// Restrict the pass to projects with this name.
    pub project: Option<String>,
}

/// Per-project result of a pass.
#[derive(Debug, Clone)]
pub struct ProjectOutcome {
    pub id: ProjectId,
    /// Derived status when the project synced.
    pub status: Option<ProjectStatus>,
    pub memories_extracted: usize,
    /// Capture of the failure when it did not.
    pub error: Option<String>,
}

impl ProjectOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate result of one pass.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub projects: Vec<ProjectOutcome>,
    pub workspaces_updated: Vec<String>,
    pub user_updated: bool,
    /// Memories newly added to the pool this pass. Incoming duplicates
    /// refresh an existing entry and are not counted.
    pub memories_merged: usize,
    pub memories_pruned: usize,
    /// Store-level failures. Any entry here makes the pass a failure.
    pub hard_errors: Vec<String>,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        self.hard_errors.is_empty() && self.projects.iter().all(ProjectOutcome::is_ok)
    }

    pub fn failed_projects(&self) -> impl Iterator<Item = &ProjectOutcome> {
        self.projects.iter().filter(|p| !p.is_ok())
    }
}

/// Drives a sync pass over one knowledge root.
pub struct Syncer {
    layout: Layout,
    config: Config,
    clock: Arc<dyn Clock>,
}

impl Syncer {
    pub fn new(layout: Layout, config: Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            layout,
            config,
            clock,
        }
    }

    /// Runs one pass. Returns `Err` only for setup failures (bad root,
    /// unknown filter); everything downstream is captured in the report.
    pub fn run(&self, options: &SyncOptions) -> Result<SyncReport> {
        let projects = self
            .layout
            .discover_projects(options.workspace.as_deref(), options.project.as_deref())?;
        info!(projects = projects.len(), "sync pass started");

        let mut report = SyncReport::default();
        let mut incoming: Vec<Memory> = Vec::new();

        for id in &projects {
            match self.sync_project(id) {
                Ok((outcome, memories)) => {
                    incoming.extend(memories);
                    report.projects.push(outcome);
                }
                Err(err) => {
                    warn!(project = %id, error = %err, "project sync failed");
                    report.projects.push(ProjectOutcome {
                        id: id.clone(),
                        status: None,
                        memories_extracted: 0,
                        error: Some(err.to_string()),
                    });
                }
            }
        }

        if let Some(text) = self.layout.read_note_input()? {
            let note = parse_note(&text);
            let memories = extract_note_memories(&note, self.clock.now());
            debug!(memories = memories.len(), "note input folded in");
            incoming.extend(memories);
        }

        self.update_stores(&projects, incoming, &mut report)?;

        info!(
            synced = report.projects.iter().filter(|p| p.is_ok()).count(),
            failed = report.projects.len() - report.projects.iter().filter(|p| p.is_ok()).count(),
            merged = report.memories_merged,
            pruned = report.memories_pruned,
            "sync pass finished"
        );
        Ok(report)
    }

    /// Parses, annotates, aggregates, and persists one project, then
    /// extracts its memories.
    fn sync_project(&self, id: &ProjectId) -> Result<(ProjectOutcome, Vec<Memory>)> {
        let docs = self.layout.read_project_docs(id)?;
        let today = self.clock.now().date_naive();

        let plan = parse_plan(docs.text_for(DocKind::Plan).unwrap_or(""));
        let status = parse_status(docs.text_for(DocKind::Status).unwrap_or(""), today);
        let tasks = parse_tasks(docs.text_for(DocKind::Tasklist).unwrap_or(""));

        // Annotations land before generated_at is taken, so the
        // artifact is never older than the sources it was built from.
        for doc in &docs.docs {
            let path = self.layout.doc_path(id, doc.kind);
            self.layout.annotate_source(&path, self.clock.now())?;
        }
        let generated_at = self.clock.now();
        let last_activity = docs.last_activity().unwrap_or(generated_at);

        let context = aggregate_project(
            id,
            plan,
            status,
            tasks,
            docs.recent_files(id),
            last_activity,
            generated_at,
            &self.config.retention,
            &self.config.limits,
        );
        self.layout.save_project_context(id, &context)?;

        let memories = extract_project_memories(&context, &docs.rel_paths(), generated_at);
        debug!(project = %id, status = ?context.summary.status, memories = memories.len(), "project synced");

        Ok((
            ProjectOutcome {
                id: id.clone(),
                status: Some(context.summary.status),
                memories_extracted: memories.len(),
                error: None,
            },
            memories,
        ))
    }

    /// Merges incoming memories into the user pool, prunes it, and
    /// rewrites the affected workspace stores and the user store.
    fn update_stores(
        &self,
        projects: &[ProjectId],
        incoming: Vec<Memory>,
        report: &mut SyncReport,
    ) -> Result<()> {
        let now = self.clock.now();
        let user = &self.config.user;

        let existing = match self.layout.load_user_store(user) {
            Ok(Some(store)) => store.memories,
            Ok(None) => Vec::new(),
            Err(err) => {
                // A corrupt pool cannot be merged into without losing
                // history; surface it instead of silently rebuilding.
                report.hard_errors.push(format!("user store: {}", err));
                return Ok(());
            }
        };

        let existing_len = existing.len();
        let merged = merge_memories(existing, incoming, now);
        // Merging only updates in place or appends, so the growth is
        // exactly the count of newly added memories.
        report.memories_merged = merged.len() - existing_len;
        let (pool, removed) = prune_memories(merged, now, &self.config.retention);
        report.memories_pruned = removed;

        let activity = self.layout.workspace_activity()?;

        // Workspace stores are projections of the pool, persisted one
        // scope at a time so a failing scope leaves siblings intact.
        let mut workspaces: Vec<&String> = projects.iter().map(|p| &p.workspace).collect();
        workspaces.sort();
        workspaces.dedup();
        for workspace in workspaces {
            match self.write_workspace_store(workspace, &pool, &activity, now) {
                Ok(()) => report.workspaces_updated.push(workspace.clone()),
                Err(err) => report
                    .hard_errors
                    .push(format!("workspace {} store: {}", workspace, err)),
            }
        }

        let user_store = ScopeStore {
            generated_at: now,
            kind: ScopeKind::User,
            workspace: None,
            quick_reference: build_quick_reference(
                &pool,
                &activity,
                now,
                &self.config.retention,
                &self.config.limits,
            ),
            summary: StoreSummary::compute(&pool),
            memories: pool,
        };
        match self.layout.save_user_store(user, &user_store) {
            Ok(()) => report.user_updated = true,
            Err(err) => report.hard_errors.push(format!("user store: {}", err)),
        }
        Ok(())
    }

    fn write_workspace_store(
        &self,
        workspace: &str,
        pool: &[Memory],
        activity: &BTreeMap<String, ScopeActivity>,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<()> {
        let memories: Vec<Memory> = pool
            .iter()
            .filter(|m| m.metadata.workspace.as_deref() == Some(workspace))
            .cloned()
            .collect();

        let mut scoped = BTreeMap::new();
        if let Some(own) = activity.get(workspace) {
            scoped.insert(workspace.to_string(), own.clone());
        }

        let store = ScopeStore {
            generated_at: now,
            kind: ScopeKind::Workspace,
            workspace: Some(workspace.to_string()),
            quick_reference: build_quick_reference(
                &memories,
                &scoped,
                now,
                &self.config.retention,
                &self.config.limits,
            ),
            summary: StoreSummary::compute(&memories),
            memories,
        };
        self.layout.save_workspace_store(workspace, &store)
    }
}
