//! Free-form note input parser.
//!
//! An optional per-run text file (`context-input.md`) holds ad hoc
//! ideas and task lines plus inline references: `workspaces/<name>`
//! mentions, project paths, file paths, and `#tag` markers. Parsed with
//! the same heuristic style as the document parsers and fed into memory
//! extraction as an additional synthetic source.

use crate::types::ProjectId;
use regex::Regex;
use std::sync::OnceLock;

/// Structured extraction from the free-form note.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NoteInput {
    /// Plain bullet lines that are not task lines.
    pub ideas: Vec<String>,
    /// Lines marked TODO / FIXME / TASK / TAREA.
    pub tasks: Vec<String>,
    /// Referenced workspace names.
    pub workspaces: Vec<String>,
    /// Referenced projects (with workspace where determinable).
    pub projects: Vec<ProjectId>,
    /// Referenced file paths.
    pub files: Vec<String>,
    /// `#tag` / `@tag` markers.
    pub tags: Vec<String>,
    /// Full original text.
    pub raw_text: String,
}

impl NoteInput {
    pub fn is_empty(&self) -> bool {
        self.ideas.is_empty() && self.tasks.is_empty()
    }
}

fn task_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?im)(?:TODO|FIXME|TASK|TAREA)[:\s]+(.+)$").expect("task line pattern")
    })
}

fn bullet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^[-*•]\s+(.+)$").expect("bullet pattern"))
}

fn workspace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"workspaces/([^\s/]+)").expect("workspace ref pattern"))
}

fn project_path_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"workspaces/([^\s/]+)/projects/([^\s/]+)").expect("project ref pattern")
    })
}

fn bare_project_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"projects/([^\s/]+)").expect("bare project pattern"))
}

fn file_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[^\s]+\.(?:md|rs|ts|js|json|toml|txt|py|sh)").expect("file ref pattern")
    })
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[#@]([A-Za-z0-9_-]+)").expect("tag pattern"))
}

/// Parses the free-form note. Pure; never fails.
pub fn parse_note(text: &str) -> NoteInput {
    let tasks: Vec<String> = task_line_re()
        .captures_iter(text)
        .map(|caps| caps[1].trim().to_string())
        .collect();

    // Bullets that already matched as task lines stay out of the idea
    // list so one line never produces two memories.
    let ideas = bullet_re()
        .captures_iter(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|idea| !task_line_re().is_match(idea))
        .collect();

    let workspaces: Vec<String> = dedup(
        workspace_re()
            .captures_iter(text)
            .map(|caps| caps[1].to_string()),
    );

    let mut projects: Vec<ProjectId> = Vec::new();
    for caps in project_path_re().captures_iter(text) {
        let id = ProjectId::new(&caps[1], &caps[2]);
        if !projects.contains(&id) {
            projects.push(id);
        }
    }
    // Bare `projects/<name>` mentions bind to the first referenced
    // workspace when one exists.
    if let Some(workspace) = workspaces.first() {
        for caps in bare_project_re().captures_iter(text) {
            let name = &caps[1];
            if !projects.iter().any(|p| p.project == *name) {
                projects.push(ProjectId::new(workspace.clone(), name));
            }
        }
    }

    let files = dedup(
        file_re()
            .find_iter(text)
            .map(|m| m.as_str().to_string()),
    );
    let tags = dedup(
        tag_re()
            .captures_iter(text)
            .map(|caps| caps[1].to_string()),
    );

    NoteInput {
        ideas,
        tasks,
        workspaces,
        projects,
        files,
        tags,
        raw_text: text.to_string(),
    }
}

/// Order-preserving first-seen de-duplication.
fn dedup(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = Vec::new();
    for item in items {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}
