//! Memory extraction.
//!
//! Turns an aggregated project context (and, separately, a parsed
//! free-form note) into candidate memories for the merge step. Every
//! extracted memory carries its scope, the documents it came from, and
//! a relevance grade; identity de-duplication happens later in the
//! merger, not here.

use crate::parse::NoteInput;
use crate::types::{
    Memory, MemoryMetadata, MemoryStatus, Priority, ProjectContext, Relevance, Task, TaskStatus,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Extracts memories from one project context.
///
/// `doc_paths` are the root-relative paths of the source documents the
/// context was aggregated from; every memory references all of them.
pub fn extract_project_memories(
    context: &ProjectContext,
    doc_paths: &[String],
    now: DateTime<Utc>,
) -> Vec<Memory> {
    let mut memories = Vec::new();
    let scope = ProjectScope {
        workspace: &context.workspace,
        project: &context.project,
        files: doc_paths,
        now,
    };

    for decision in &context.status.decisions {
        let content = match &decision.rationale {
            Some(rationale) => format!(
                "Decision [{}]: {} ({})",
                context.project, decision.decision, rationale
            ),
            None => format!("Decision [{}]: {}", context.project, decision.decision),
        };
        memories.push(scope.memory(content, Relevance::High, vec!["decision".into()]));
    }

    for step in &context.status.next_steps {
        memories.push(scope.memory(
            format!("Next step [{}]: {}", context.project, step),
            Relevance::High,
            vec!["next-step".into()],
        ));
    }

    for blocker in &context.status.blockers {
        memories.push(scope.memory(
            format!("Blocker [{}]: {}", context.project, blocker),
            Relevance::High,
            vec!["blocker".into()],
        ));
    }

    for task in priority_tasks(&context.tasks.tasks) {
        let relevance = if task.priority == Some(Priority::High) {
            Relevance::High
        } else {
            Relevance::Medium
        };
        memories.push(scope.memory(
            format!("Task [{}]: {}", context.project, task.description),
            relevance,
            vec!["task".into(), task.status.as_tag().into()],
        ));
    }

    memories
}

/// Tasks worth remembering: every high-priority in-progress task, every
/// high-priority pending task, the first three in-progress and first two
/// pending regardless of priority, de-duplicated, five at most.
fn priority_tasks(tasks: &[Task]) -> Vec<&Task> {
    let in_progress: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::InProgress)
        .collect();
    let pending: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Pending)
        .collect();
    let high = |t: &&&Task| t.priority == Some(Priority::High);

    let mut selected: Vec<&Task> = Vec::new();
    let candidates = in_progress
        .iter()
        .filter(high)
        .chain(pending.iter().filter(high))
        .chain(in_progress.iter().take(3))
        .chain(pending.iter().take(2))
        .copied();
    for task in candidates {
        if selected.len() >= 5 {
            break;
        }
        if !selected.iter().any(|t| std::ptr::eq(*t, task)) {
            selected.push(task);
        }
    }
    selected
}

/// Extracts memories from the free-form note input. Ideas land as
/// medium-relevance observations, task lines as high-relevance task
/// memories; scope comes from the note's own references when present.
pub fn extract_note_memories(input: &NoteInput, now: DateTime<Utc>) -> Vec<Memory> {
    let workspace = input
        .projects
        .first()
        .map(|p| p.workspace.clone())
        .or_else(|| input.workspaces.first().cloned());
    let project = input.projects.first().map(|p| p.project.clone());

    let scope = NoteScope {
        workspace,
        project,
        files: &input.files,
        tags: &input.tags,
        now,
    };

    let mut memories = Vec::new();
    for idea in &input.ideas {
        memories.push(scope.memory(idea.clone(), Relevance::Medium, vec![]));
    }
    for task in &input.tasks {
        memories.push(scope.memory(
            format!("Task: {}", task),
            Relevance::High,
            vec!["task".into()],
        ));
    }
    memories
}

struct ProjectScope<'a> {
    workspace: &'a str,
    project: &'a str,
    files: &'a [String],
    now: DateTime<Utc>,
}

impl ProjectScope<'_> {
    fn memory(&self, content: String, relevance: Relevance, tags: Vec<String>) -> Memory {
        Memory {
            id: Uuid::new_v4(),
            content,
            metadata: MemoryMetadata {
                workspace: Some(self.workspace.to_string()),
                project: Some(self.project.to_string()),
                files: self.files.to_vec(),
                tags,
                created_at: self.now,
                updated_at: self.now,
                relevance,
                status: MemoryStatus::Active,
            },
        }
    }
}

struct NoteScope<'a> {
    workspace: Option<String>,
    project: Option<String>,
    files: &'a [String],
    tags: &'a [String],
    now: DateTime<Utc>,
}

impl NoteScope<'_> {
    fn memory(&self, content: String, relevance: Relevance, mut tags: Vec<String>) -> Memory {
        for tag in self.tags {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
        Memory {
            id: Uuid::new_v4(),
            content,
            metadata: MemoryMetadata {
                workspace: self.workspace.clone(),
                project: self.project.clone(),
                files: self.files.to_vec(),
                tags,
                created_at: self.now,
                updated_at: self.now,
                relevance,
                status: MemoryStatus::Active,
            },
        }
    }
}
