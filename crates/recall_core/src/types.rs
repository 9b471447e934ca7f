//! Core data types for the context store.
//!
//! The JSON shapes (camelCase fields, lowercase enum values) match the
//! persisted artifacts: `project_context.json` per project and
//! `context.json` per workspace and per user. Hand-edited markdown is
//! the source of truth; everything here is a regenerable cache.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// How strongly a memory should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relevance {
    High,
    Medium,
    Low,
}

/// Lifecycle state of a memory. Archived memories are kept for a
/// retention window, then pruned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryStatus {
    Active,
    Archived,
}

/// Derived project status. Computed by the aggregator, never hand-edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Paused,
    Completed,
}

/// Task state as written in the task list document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Blocked,
}

impl TaskStatus {
    /// Tag value used when a task is turned into a memory.
    pub fn as_tag(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
        }
    }
}

/// Explicit task priority marker (`[high]`, `[medium]`, `[low]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Kind tag for a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocKind {
    Plan,
    Status,
    Tasklist,
}

impl DocKind {
    /// All document kinds, in the order they are read per project.
    pub const ALL: [DocKind; 3] = [DocKind::Plan, DocKind::Status, DocKind::Tasklist];

    /// File name of this document inside a project directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            DocKind::Plan => "plan.md",
            DocKind::Status => "status.md",
            DocKind::Tasklist => "tasks.md",
        }
    }
}

impl fmt::Display for DocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Scope level of a persisted store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    Project,
    Workspace,
    User,
}

/// Identifies one project within a workspace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectId {
    pub workspace: String,
    pub project: String,
}

impl ProjectId {
    pub fn new(workspace: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            workspace: workspace.into(),
            project: project.into(),
        }
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.workspace, self.project)
    }
}

/// Scope and provenance metadata attached to a memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryMetadata {
    /// Workspace this memory belongs to, if scoped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    /// Project this memory belongs to, if scoped below a workspace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Source files this memory was derived from (root-relative paths).
    pub files: Vec<String>,
    /// Tags for lookup and ranking.
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub relevance: Relevance,
    pub status: MemoryStatus,
}

/// An atomic extracted fact.
///
/// Identity for merge purposes is the tuple (workspace, project, content):
/// two memories with identical text in the same scope are the same logical
/// fact even if regenerated independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub id: Uuid,
    pub content: String,
    pub metadata: MemoryMetadata,
}

impl Memory {
    /// The merge identity key.
    pub fn identity(&self) -> (Option<&str>, Option<&str>, &str) {
        (
            self.metadata.workspace.as_deref(),
            self.metadata.project.as_deref(),
            &self.content,
        )
    }
}

/// One ordered phase of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
}

/// A risk and its optional mitigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Risk {
    pub risk: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mitigation: Option<String>,
}

/// Structured extraction from a plan document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedPlan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub phases: Vec<Phase>,
    pub success_criteria: Vec<String>,
    pub risks: Vec<Risk>,
    /// Full original text. Populated even when nothing else parsed, so
    /// no information is silently lost.
    pub raw_content: String,
}

/// One dated progress entry from a status document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub date: NaiveDate,
    pub completed: Vec<String>,
    pub in_progress: Vec<String>,
    pub notes: Vec<String>,
}

/// A dated decision with optional rationale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub decision: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

/// Structured extraction from a status document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedStatus {
    pub progress: Vec<ProgressEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_status: Option<String>,
    pub decisions: Vec<Decision>,
    pub blockers: Vec<String>,
    pub next_steps: Vec<String>,
    pub raw_content: String,
}

/// One task from a task list document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub description: String,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// Structured extraction from a task list document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTasks {
    pub tasks: Vec<Task>,
}

impl ParsedTasks {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks in the given status, in document order.
    pub fn with_status(&self, status: TaskStatus) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| t.status == status)
    }

    /// Per-status counts for the project summary.
    pub fn counts(&self) -> TaskCounts {
        let mut counts = TaskCounts {
            total: self.tasks.len(),
            ..TaskCounts::default()
        };
        for task in &self.tasks {
            match task.status {
                TaskStatus::Completed => counts.completed += 1,
                TaskStatus::Pending => counts.pending += 1,
                TaskStatus::InProgress => counts.in_progress += 1,
                TaskStatus::Blocked => counts.blocked += 1,
            }
        }
        counts
    }
}

/// Task count summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub blocked: usize,
}

/// Entry in a quick reference's recent-memories list.
///
/// At project scope these are synthetic display entries (not persisted
/// memories), so the id is a plain string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentMemory {
    pub id: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// A sub-scope with recent activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveScope {
    pub name: String,
    pub active_projects: Vec<String>,
    pub last_activity: DateTime<Utc>,
}

/// A recently referenced file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentFile {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    pub last_modified: DateTime<Utc>,
}

/// Navigation link to a project's artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectLink {
    pub workspace: String,
    pub path: String,
    pub context_path: String,
}

/// Navigation link to a workspace's store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceLink {
    pub context_path: String,
    pub active_projects: usize,
}

/// Navigation table mapping sub-scope keys to their store locations.
/// BTreeMaps keep serialization order stable across rebuilds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavLinks {
    pub projects: BTreeMap<String, ProjectLink>,
    pub workspaces: BTreeMap<String, WorkspaceLink>,
}

/// Materialized, read-optimized view over a store's memories.
///
/// Holds no information not present elsewhere; fully recomputed (never
/// incrementally patched) on every update.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickReference {
    pub recent_memories: Vec<RecentMemory>,
    pub active_scopes: Vec<ActiveScope>,
    pub recent_files: Vec<RecentFile>,
    pub recent_tags: Vec<String>,
    pub links: NavLinks,
}

/// Derived summary block of a project context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub status: ProjectStatus,
    pub last_activity: DateTime<Utc>,
    pub task_counts: TaskCounts,
}

/// The fan-in of one project's three parsed records.
///
/// Invariant: `generated_at` is at least as new as the mtime of every
/// source document read to build it. The staleness validator checks
/// exactly this contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectContext {
    pub generated_at: DateTime<Utc>,
    pub workspace: String,
    pub project: String,
    pub plan: ParsedPlan,
    pub status: ParsedStatus,
    pub tasks: ParsedTasks,
    pub quick_reference: QuickReference,
    pub summary: ProjectSummary,
}

impl ProjectContext {
    pub fn id(&self) -> ProjectId {
        ProjectId::new(self.workspace.clone(), self.project.clone())
    }
}

/// Summary counts over a scope store's memories.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSummary {
    pub total_memories: usize,
    pub active_memories: usize,
    pub by_workspace: BTreeMap<String, usize>,
    pub by_project: BTreeMap<String, usize>,
}

impl StoreSummary {
    /// Recompute counts from a memory list.
    pub fn compute(memories: &[Memory]) -> Self {
        let mut summary = StoreSummary {
            total_memories: memories.len(),
            ..StoreSummary::default()
        };
        for memory in memories {
            if memory.metadata.status == MemoryStatus::Active {
                summary.active_memories += 1;
            }
            if let Some(workspace) = &memory.metadata.workspace {
                *summary.by_workspace.entry(workspace.clone()).or_default() += 1;
                if let Some(project) = &memory.metadata.project {
                    let key = format!("{}/{}", workspace, project);
                    *summary.by_project.entry(key).or_default() += 1;
                }
            }
        }
        summary
    }
}

/// The persisted aggregate for workspace or user scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeStore {
    pub generated_at: DateTime<Utc>,
    pub kind: ScopeKind,
    /// Workspace name for workspace-level stores; absent at user level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    pub quick_reference: QuickReference,
    pub memories: Vec<Memory>,
    pub summary: StoreSummary,
}

impl ScopeStore {
    /// Synthesizes an empty store, used when no prior store exists for a
    /// scope (which is not an error, just the first sync).
    pub fn empty(kind: ScopeKind, workspace: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            generated_at: now,
            kind,
            workspace,
            quick_reference: QuickReference::default(),
            memories: Vec::new(),
            summary: StoreSummary::default(),
        }
    }
}
