//! Staleness validation.
//!
//! Read-only pass over the knowledge root that answers one question per
//! scope: is the derived artifact at least as new as its sources? It
//! never parses documents and never writes; fixing drift is `sync`'s
//! job.

use crate::config::Config;
use crate::error::Result;
use crate::store::Layout;
use crate::types::{ProjectId, ScopeKind};
use serde::Serialize;
use tracing::debug;

/// Outcome of checking a single scope's artifact.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeCheck {
    /// Scope key: "ws/proj", workspace name, or user id.
    pub scope: String,
    pub kind: ScopeKind,
    pub ok: bool,
    /// Why the scope is outdated; absent when `ok`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ScopeCheck {
    fn ok(scope: String, kind: ScopeKind) -> Self {
        Self {
            scope,
            kind,
            ok: true,
            reason: None,
        }
    }

    fn outdated(scope: String, kind: ScopeKind, reason: impl Into<String>) -> Self {
        Self {
            scope,
            kind,
            ok: false,
            reason: Some(reason.into()),
        }
    }
}

/// Machine-readable validation result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub checks: Vec<ScopeCheck>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.checks.iter().all(|c| c.ok)
    }

    pub fn outdated(&self) -> impl Iterator<Item = &ScopeCheck> {
        self.checks.iter().filter(|c| !c.ok)
    }

    pub fn outdated_count(&self) -> usize {
        self.outdated().count()
    }

    /// One-line human summary.
    pub fn summary(&self) -> String {
        if self.is_clean() {
            format!("{} scopes checked, all in sync", self.checks.len())
        } else {
            format!(
                "{} scopes checked, {} outdated",
                self.checks.len(),
                self.outdated_count()
            )
        }
    }
}

/// Checks every project context, workspace store, and the user store
/// under the root.
pub fn validate(layout: &Layout, config: &Config) -> Result<ValidationReport> {
    let mut checks = Vec::new();

    for id in layout.discover_projects(None, None)? {
        checks.push(check_project(layout, &id)?);
    }

    for workspace in layout.workspace_activity()?.keys() {
        let check = if layout.workspace_store_path(workspace).is_file() {
            ScopeCheck::ok(workspace.clone(), ScopeKind::Workspace)
        } else {
            ScopeCheck::outdated(workspace.clone(), ScopeKind::Workspace, "context.json missing")
        };
        checks.push(check);
    }

    let user_check = if layout.user_store_path(&config.user).is_file() {
        ScopeCheck::ok(config.user.clone(), ScopeKind::User)
    } else {
        ScopeCheck::outdated(config.user.clone(), ScopeKind::User, "context.json missing")
    };
    checks.push(user_check);

    let report = ValidationReport { checks };
    debug!(summary = %report.summary(), "validation finished");
    Ok(report)
}

/// A project is in sync when its context artifact exists, decodes, and
/// carries a `generatedAt` no older than any source document's mtime.
fn check_project(layout: &Layout, id: &ProjectId) -> Result<ScopeCheck> {
    let scope = id.to_string();

    let context = match layout.load_project_context(id) {
        Ok(Some(context)) => context,
        Ok(None) => {
            return Ok(ScopeCheck::outdated(
                scope,
                ScopeKind::Project,
                "project_context.json missing",
            ))
        }
        Err(err) => {
            return Ok(ScopeCheck::outdated(
                scope,
                ScopeKind::Project,
                format!("unreadable artifact: {}", err),
            ))
        }
    };

    let docs = layout.read_project_docs(id)?;
    for doc in &docs.docs {
        if doc.mtime > context.generated_at {
            return Ok(ScopeCheck::outdated(
                scope,
                ScopeKind::Project,
                format!("{} modified after last sync", doc.kind),
            ));
        }
    }
    Ok(ScopeCheck::ok(scope, ScopeKind::Project))
}
