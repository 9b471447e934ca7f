//! Project aggregation.
//!
//! Combines a project's three parsed records into a single project
//! context: derived status, task statistics, and a project-scoped quick
//! reference of display entries.

use crate::config::{LimitsConfig, RetentionConfig};
use crate::quickref::{project_context_rel_path, workspace_store_rel_path};
use crate::types::{
    NavLinks, ParsedPlan, ParsedStatus, ParsedTasks, Priority, ProjectContext, ProjectId,
    ProjectLink, ProjectStatus, ProjectSummary, QuickReference, RecentFile, RecentMemory, Task,
    TaskStatus, WorkspaceLink,
};
use chrono::{DateTime, Duration, NaiveTime, Utc};

/// Builds a project context from parsed records.
///
/// `last_activity` is the max mtime across the source documents read;
/// `generated_at` must be taken after every source read (and after any
/// source annotation write) so the staleness contract holds.
#[allow(clippy::too_many_arguments)]
pub fn aggregate_project(
    id: &ProjectId,
    plan: ParsedPlan,
    status: ParsedStatus,
    tasks: ParsedTasks,
    source_files: Vec<RecentFile>,
    last_activity: DateTime<Utc>,
    generated_at: DateTime<Utc>,
    retention: &RetentionConfig,
    limits: &LimitsConfig,
) -> ProjectContext {
    let derived = derive_status(&tasks, last_activity, generated_at, retention.pause_after_days);
    let quick_reference = project_quick_reference(
        id,
        &plan,
        &status,
        &tasks,
        source_files,
        last_activity,
        limits,
    );

    ProjectContext {
        generated_at,
        workspace: id.workspace.clone(),
        project: id.project.clone(),
        summary: ProjectSummary {
            status: derived,
            last_activity,
            task_counts: tasks.counts(),
        },
        plan,
        status,
        tasks,
        quick_reference,
    }
}

/// Derived project status, first match wins:
/// 1. no source activity for longer than the pause window → paused
/// 2. non-empty task list, every task completed → completed
/// 3. otherwise (including "no tasks at all") → active
pub fn derive_status(
    tasks: &ParsedTasks,
    last_activity: DateTime<Utc>,
    now: DateTime<Utc>,
    pause_after_days: u32,
) -> ProjectStatus {
    if now - last_activity > Duration::days(i64::from(pause_after_days)) {
        return ProjectStatus::Paused;
    }
    if !tasks.is_empty()
        && tasks
            .tasks
            .iter()
            .all(|t| t.status == TaskStatus::Completed)
    {
        return ProjectStatus::Completed;
    }
    ProjectStatus::Active
}

/// Project-scoped quick reference. The recent-memories list holds
/// synthetic display entries built from decisions, next steps, and
/// prioritized tasks; these are not persisted memories.
fn project_quick_reference(
    id: &ProjectId,
    plan: &ParsedPlan,
    status: &ParsedStatus,
    tasks: &ParsedTasks,
    source_files: Vec<RecentFile>,
    last_activity: DateTime<Utc>,
    limits: &LimitsConfig,
) -> QuickReference {
    let mut entries: Vec<RecentMemory> = Vec::new();

    for (index, decision) in status.decisions.iter().take(limits.display_entries).enumerate() {
        entries.push(RecentMemory {
            id: format!("decision-{}", index),
            content: format!("Decision: {}", decision.decision),
            workspace: Some(id.workspace.clone()),
            project: Some(id.project.clone()),
            updated_at: decision.date.and_time(NaiveTime::MIN).and_utc(),
        });
    }

    for (index, step) in status.next_steps.iter().take(limits.display_entries).enumerate() {
        entries.push(RecentMemory {
            id: format!("next-step-{}", index),
            content: format!("Next step: {}", step),
            workspace: Some(id.workspace.clone()),
            project: Some(id.project.clone()),
            updated_at: last_activity,
        });
    }

    for (index, task) in display_tasks(tasks, limits.display_entries).iter().enumerate() {
        let content = match task.priority {
            Some(Priority::High) => format!("Task [high]: {}", task.description),
            Some(Priority::Medium) => format!("Task [medium]: {}", task.description),
            Some(Priority::Low) => format!("Task [low]: {}", task.description),
            None => format!("Task: {}", task.description),
        };
        entries.push(RecentMemory {
            id: format!("task-{}", index),
            content,
            workspace: Some(id.workspace.clone()),
            project: Some(id.project.clone()),
            updated_at: last_activity,
        });
    }

    entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    entries.truncate(limits.recent_memories);

    QuickReference {
        recent_memories: entries,
        active_scopes: Vec::new(),
        recent_files: source_files,
        recent_tags: heuristic_tags(plan, status, tasks),
        links: project_links(id),
    }
}

/// Tasks worth displaying: explicit high priority first, then
/// unprioritized or medium, in-progress before pending within each band.
fn display_tasks(tasks: &ParsedTasks, cap: usize) -> Vec<&Task> {
    let high = |t: &&Task| t.priority == Some(Priority::High);
    let normal = |t: &&Task| matches!(t.priority, None | Some(Priority::Medium));

    tasks
        .with_status(TaskStatus::InProgress)
        .filter(high)
        .chain(tasks.with_status(TaskStatus::Pending).filter(high))
        .chain(tasks.with_status(TaskStatus::InProgress).filter(normal))
        .chain(tasks.with_status(TaskStatus::Pending).filter(normal))
        .take(cap)
        .collect()
}

fn heuristic_tags(plan: &ParsedPlan, status: &ParsedStatus, tasks: &ParsedTasks) -> Vec<String> {
    let mut tags = Vec::new();
    if !plan.phases.is_empty() {
        tags.push("phases".to_string());
    }
    if tasks.with_status(TaskStatus::InProgress).next().is_some() {
        tags.push("in-progress".to_string());
    }
    if tasks.with_status(TaskStatus::Blocked).next().is_some() {
        tags.push("blocked".to_string());
    }
    if !status.blockers.is_empty() {
        tags.push("blockers".to_string());
    }
    if !plan.risks.is_empty() {
        tags.push("risks".to_string());
    }
    tags
}

fn project_links(id: &ProjectId) -> NavLinks {
    let mut links = NavLinks::default();
    links.projects.insert(
        id.to_string(),
        ProjectLink {
            workspace: id.workspace.clone(),
            path: format!("workspaces/{}/projects/{}/", id.workspace, id.project),
            context_path: project_context_rel_path(&id.workspace, &id.project),
        },
    );
    links.workspaces.insert(
        id.workspace.clone(),
        WorkspaceLink {
            context_path: workspace_store_rel_path(&id.workspace),
            active_projects: 1,
        },
    );
    links
}
