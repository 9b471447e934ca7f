//! Filesystem layout and artifact persistence.
//!
//! The knowledge root is a plain directory tree:
//!
//! ```text
//! <root>/
//!   recall.toml
//!   context-input.md            (optional free-form note)
//!   workspaces/<ws>/context.json
//!   workspaces/<ws>/projects/<proj>/{plan.md,status.md,tasks.md,project_context.json}
//!   users/<user>/context.json
//! ```
//!
//! Markdown documents are hand-edited sources of truth; every JSON file
//! is a regenerable cache. Loads of missing stores return `Ok(None)` so
//! the first sync can synthesize an empty one.

use crate::error::{RecallError, Result};
use crate::quickref::ScopeActivity;
use crate::types::{DocKind, ProjectContext, ProjectId, RecentFile, ScopeStore};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Root-level file name of the free-form note input.
pub const NOTE_INPUT_FILE: &str = "context-input.md";

/// One source document read from disk.
#[derive(Debug, Clone)]
pub struct SourceDoc {
    pub kind: DocKind,
    /// Path relative to the knowledge root, used in memory provenance.
    pub rel_path: String,
    pub text: String,
    pub mtime: DateTime<Utc>,
}

/// The source documents present for one project. Any subset of the
/// three kinds may exist; a project with no documents at all still
/// syncs to an empty context.
#[derive(Debug, Clone, Default)]
pub struct ProjectDocs {
    pub docs: Vec<SourceDoc>,
}

impl ProjectDocs {
    pub fn text_for(&self, kind: DocKind) -> Option<&str> {
        self.docs
            .iter()
            .find(|d| d.kind == kind)
            .map(|d| d.text.as_str())
    }

    /// Most recent mtime across the documents, if any exist.
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.docs.iter().map(|d| d.mtime).max()
    }

    pub fn rel_paths(&self) -> Vec<String> {
        self.docs.iter().map(|d| d.rel_path.clone()).collect()
    }

    /// Source documents as quick-reference file entries.
    pub fn recent_files(&self, id: &ProjectId) -> Vec<RecentFile> {
        self.docs
            .iter()
            .map(|d| RecentFile {
                path: d.rel_path.clone(),
                workspace: Some(id.workspace.clone()),
                project: Some(id.project.clone()),
                last_modified: d.mtime,
            })
            .collect()
    }
}

/// Path oracle and persistence over one knowledge root.
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    /// Wraps a root path without checking it. Used by `init`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Opens an existing root, failing if it was never initialized.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let layout = Self::new(root);
        if !layout.workspaces_dir().is_dir() {
            return Err(RecallError::RootNotInitialized {
                path: layout.root.clone(),
            });
        }
        Ok(layout)
    }

    /// Creates the root directory skeleton for the given user.
    pub fn ensure_structure(&self, user: &str) -> Result<()> {
        fs::create_dir_all(self.workspaces_dir())?;
        fs::create_dir_all(self.root.join("users").join(user))?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn workspaces_dir(&self) -> PathBuf {
        self.root.join("workspaces")
    }

    pub fn project_dir(&self, id: &ProjectId) -> PathBuf {
        self.workspaces_dir()
            .join(&id.workspace)
            .join("projects")
            .join(&id.project)
    }

    pub fn doc_path(&self, id: &ProjectId, kind: DocKind) -> PathBuf {
        self.project_dir(id).join(kind.file_name())
    }

    /// Root-relative path of a source document, as stored in provenance.
    pub fn doc_rel_path(&self, id: &ProjectId, kind: DocKind) -> String {
        format!(
            "workspaces/{}/projects/{}/{}",
            id.workspace,
            id.project,
            kind.file_name()
        )
    }

    pub fn project_context_path(&self, id: &ProjectId) -> PathBuf {
        self.project_dir(id).join("project_context.json")
    }

    pub fn workspace_store_path(&self, workspace: &str) -> PathBuf {
        self.workspaces_dir().join(workspace).join("context.json")
    }

    pub fn user_store_path(&self, user: &str) -> PathBuf {
        self.root.join("users").join(user).join("context.json")
    }

    pub fn note_input_path(&self) -> PathBuf {
        self.root.join(NOTE_INPUT_FILE)
    }

    /// Enumerates projects under the root, honoring optional workspace
    /// and project name filters. A named filter that matches nothing is
    /// an error; an unfiltered empty root is just an empty list.
    pub fn discover_projects(
        &self,
        workspace: Option<&str>,
        project: Option<&str>,
    ) -> Result<Vec<ProjectId>> {
        let workspaces = list_dirs(&self.workspaces_dir())?;
        if let Some(filter) = workspace {
            if !workspaces.iter().any(|w| w == filter) {
                return Err(RecallError::WorkspaceNotFound(filter.to_string()));
            }
        }

        let mut projects = Vec::new();
        for ws in &workspaces {
            if workspace.is_some_and(|filter| filter != ws.as_str()) {
                continue;
            }
            let projects_dir = self.workspaces_dir().join(ws).join("projects");
            for proj in list_dirs(&projects_dir)? {
                if project.is_some_and(|filter| filter != proj.as_str()) {
                    continue;
                }
                projects.push(ProjectId::new(ws.clone(), proj));
            }
        }

        if let Some(filter) = project {
            if projects.is_empty() {
                return Err(RecallError::ProjectNotFound {
                    workspace: workspace.unwrap_or("*").to_string(),
                    project: filter.to_string(),
                });
            }
        }
        projects.sort();
        Ok(projects)
    }

    /// Per-workspace activity map for quick-reference scope listings.
    /// Covers every workspace under the root, not just synced ones.
    pub fn workspace_activity(&self) -> Result<BTreeMap<String, ScopeActivity>> {
        let mut map = BTreeMap::new();
        for ws in list_dirs(&self.workspaces_dir())? {
            let projects_dir = self.workspaces_dir().join(&ws).join("projects");
            let projects = list_dirs(&projects_dir)?;

            let mut last_activity = mtime_of(&self.workspaces_dir().join(&ws))?;
            for proj in &projects {
                let id = ProjectId::new(ws.clone(), proj.clone());
                for kind in DocKind::ALL {
                    let path = self.doc_path(&id, kind);
                    if path.is_file() {
                        last_activity = last_activity.max(mtime_of(&path)?);
                    }
                }
            }
            map.insert(
                ws,
                ScopeActivity {
                    projects,
                    last_activity,
                },
            );
        }
        Ok(map)
    }

    /// Reads whichever of the three source documents exist.
    pub fn read_project_docs(&self, id: &ProjectId) -> Result<ProjectDocs> {
        let mut docs = Vec::new();
        for kind in DocKind::ALL {
            let path = self.doc_path(id, kind);
            if !path.is_file() {
                continue;
            }
            docs.push(SourceDoc {
                kind,
                rel_path: self.doc_rel_path(id, kind),
                text: fs::read_to_string(&path)?,
                mtime: mtime_of(&path)?,
            });
        }
        Ok(ProjectDocs { docs })
    }

    /// Returns the free-form note text, or `None` when the file is
    /// absent or blank.
    pub fn read_note_input(&self) -> Result<Option<String>> {
        let path = self.note_input_path();
        if !path.is_file() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path)?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(text))
    }

    pub fn load_project_context(&self, id: &ProjectId) -> Result<Option<ProjectContext>> {
        load_json(&self.project_context_path(id))
    }

    pub fn save_project_context(&self, id: &ProjectId, context: &ProjectContext) -> Result<()> {
        save_json(&self.project_context_path(id), context)
    }

    pub fn load_workspace_store(&self, workspace: &str) -> Result<Option<ScopeStore>> {
        load_json(&self.workspace_store_path(workspace))
    }

    pub fn save_workspace_store(&self, workspace: &str, store: &ScopeStore) -> Result<()> {
        save_json(&self.workspace_store_path(workspace), store)
    }

    pub fn load_user_store(&self, user: &str) -> Result<Option<ScopeStore>> {
        load_json(&self.user_store_path(user))
    }

    pub fn save_user_store(&self, user: &str, store: &ScopeStore) -> Result<()> {
        save_json(&self.user_store_path(user), store)
    }

    /// Upserts the "last synced" annotation at the top of a source
    /// document: an HTML comment plus a visible note, replaced in place
    /// on re-sync, never duplicated. The annotation is for readers; the
    /// parsers never look at it.
    pub fn annotate_source(&self, path: &Path, now: DateTime<Utc>) -> Result<()> {
        let text = fs::read_to_string(path)?;
        let body: String = text
            .lines()
            .filter(|line| !is_annotation_line(line))
            .collect::<Vec<_>>()
            .join("\n");
        let body = body.trim_start_matches('\n');

        let stamp = now.format("%Y-%m-%dT%H:%M:%SZ");
        let annotated = ensure_trailing_newline(format!(
            "<!-- synced: {stamp} -->\n> Last synced {stamp}. Edits below are picked up on the next sync.\n\n{}",
            body
        ));
        // Skip the write when nothing changed, so re-syncs with the
        // same timestamp leave mtimes alone.
        if annotated != text {
            fs::write(path, annotated)?;
        }
        Ok(())
    }
}

fn is_annotation_line(line: &str) -> bool {
    line.starts_with("<!-- synced:") || line.starts_with("> Last synced")
}

fn ensure_trailing_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

/// Directory names under `path`, in name order. A missing parent is an
/// empty listing, not an error.
fn list_dirs(path: &Path) -> Result<Vec<String>> {
    if !path.is_dir() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

fn mtime_of(path: &Path) -> Result<DateTime<Utc>> {
    Ok(DateTime::<Utc>::from(fs::metadata(path)?.modified()?))
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.is_file() {
        return Ok(None);
    }
    let text = fs::read_to_string(path)?;
    let value = serde_json::from_str(&text).map_err(|e| RecallError::MalformedArtifact {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(Some(value))
}

/// Writes pretty JSON with a trailing newline, creating parents as
/// needed. Output is deterministic for deterministic input.
fn save_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json =
        serde_json::to_string_pretty(value).map_err(|e| RecallError::Serialization(e.to_string()))?;
    fs::write(path, ensure_trailing_newline(json))?;
    Ok(())
}
