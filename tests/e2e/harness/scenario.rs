//! Declarative scenario builder.

use crate::harness::workspace::World;
use anyhow::{ensure, Context, Result};
use chrono::Duration;
use recall_core::{validate, DocKind, ProjectId, ProjectStatus};
use std::fs;

enum Step {
    Doc {
        workspace: String,
        project: String,
        kind: DocKind,
        text: String,
    },
    Note(String),
    Sync {
        workspace: Option<String>,
        project: Option<String>,
    },
    /// Put a directory where the project artifact belongs, so persisting
    /// that project fails while siblings keep working.
    BreakArtifact {
        workspace: String,
        project: String,
    },
    /// Rewrite the project artifact with an older `generatedAt`.
    BackdateArtifact {
        workspace: String,
        project: String,
        hours: i64,
    },
    CaptureUserStore,
    AssertUserStoreUnchanged,
    AssertSyncSuccess(bool),
    AssertFailedProjects(usize),
    AssertProjectStatus {
        workspace: String,
        project: String,
        status: ProjectStatus,
    },
    AssertUserMemories(Vec<String>),
    AssertRecentOrder(Vec<String>),
    AssertWorkspaceMemories {
        workspace: String,
        count: usize,
    },
    AssertValidateClean(bool),
    AssertOutdatedReason {
        scope: String,
        contains: String,
    },
}

/// Fluent scenario: seed, act, assert, then `run`.
pub struct Scenario {
    name: &'static str,
    user: String,
    steps: Vec<Step>,
}

impl Scenario {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            user: "ana".into(),
            steps: Vec::new(),
        }
    }

    pub fn with_user(mut self, user: &str) -> Self {
        self.user = user.into();
        self
    }

    pub fn doc(mut self, workspace: &str, project: &str, kind: DocKind, text: &str) -> Self {
        self.steps.push(Step::Doc {
            workspace: workspace.into(),
            project: project.into(),
            kind,
            text: text.into(),
        });
        self
    }

    pub fn note(mut self, text: &str) -> Self {
        self.steps.push(Step::Note(text.into()));
        self
    }

    pub fn sync_all(mut self) -> Self {
        self.steps.push(Step::Sync {
            workspace: None,
            project: None,
        });
        self
    }

    pub fn sync_workspace(mut self, workspace: &str) -> Self {
        self.steps.push(Step::Sync {
            workspace: Some(workspace.into()),
            project: None,
        });
        self
    }

    pub fn break_artifact(mut self, workspace: &str, project: &str) -> Self {
        self.steps.push(Step::BreakArtifact {
            workspace: workspace.into(),
            project: project.into(),
        });
        self
    }

    pub fn backdate_artifact(mut self, workspace: &str, project: &str, hours: i64) -> Self {
        self.steps.push(Step::BackdateArtifact {
            workspace: workspace.into(),
            project: project.into(),
            hours,
        });
        self
    }

    pub fn capture_user_store(mut self) -> Self {
        self.steps.push(Step::CaptureUserStore);
        self
    }

    pub fn assert_user_store_unchanged(mut self) -> Self {
        self.steps.push(Step::AssertUserStoreUnchanged);
        self
    }

    pub fn assert_sync_success(mut self, success: bool) -> Self {
        self.steps.push(Step::AssertSyncSuccess(success));
        self
    }

    pub fn assert_failed_projects(mut self, count: usize) -> Self {
        self.steps.push(Step::AssertFailedProjects(count));
        self
    }

    pub fn assert_project_status(
        mut self,
        workspace: &str,
        project: &str,
        status: ProjectStatus,
    ) -> Self {
        self.steps.push(Step::AssertProjectStatus {
            workspace: workspace.into(),
            project: project.into(),
            status,
        });
        self
    }

    pub fn assert_user_memories(mut self, contents: &[&str]) -> Self {
        self.steps
            .push(Step::AssertUserMemories(to_strings(contents)));
        self
    }

    pub fn assert_recent_order(mut self, contents: &[&str]) -> Self {
        self.steps.push(Step::AssertRecentOrder(to_strings(contents)));
        self
    }

    pub fn assert_workspace_memories(mut self, workspace: &str, count: usize) -> Self {
        self.steps.push(Step::AssertWorkspaceMemories {
            workspace: workspace.into(),
            count,
        });
        self
    }

    pub fn assert_validate_clean(mut self, clean: bool) -> Self {
        self.steps.push(Step::AssertValidateClean(clean));
        self
    }

    pub fn assert_outdated_reason(mut self, scope: &str, contains: &str) -> Self {
        self.steps.push(Step::AssertOutdatedReason {
            scope: scope.into(),
            contains: contains.into(),
        });
        self
    }

    pub fn run(self) -> Result<()> {
        let mut world = World::new(&self.user)?;
        let mut captured: Option<String> = None;

        for step in self.steps {
            match step {
                Step::Doc {
                    workspace,
                    project,
                    kind,
                    text,
                } => world.write_doc(&workspace, &project, kind, &text)?,
                Step::Note(text) => {
                    fs::write(world.layout.note_input_path(), text)?;
                }
                Step::Sync { workspace, project } => {
                    world.sync(workspace.as_deref(), project.as_deref())?
                }
                Step::BreakArtifact { workspace, project } => {
                    let id = ProjectId::new(workspace, project);
                    fs::create_dir_all(world.layout.project_context_path(&id))?;
                }
                Step::BackdateArtifact {
                    workspace,
                    project,
                    hours,
                } => {
                    let id = ProjectId::new(workspace, project);
                    let mut context = world
                        .layout
                        .load_project_context(&id)?
                        .context("artifact to backdate is missing")?;
                    context.generated_at = context.generated_at - Duration::hours(hours);
                    world.layout.save_project_context(&id, &context)?;
                }
                Step::CaptureUserStore => {
                    captured =
                        Some(fs::read_to_string(world.layout.user_store_path(&world.config.user))?);
                }
                Step::AssertUserStoreUnchanged => {
                    let current =
                        fs::read_to_string(world.layout.user_store_path(&world.config.user))?;
                    let expected = captured.as_ref().context("no captured user store")?;
                    ensure!(
                        &current == expected,
                        "[{}] user store changed between passes",
                        self.name
                    );
                }
                Step::AssertSyncSuccess(expected) => {
                    ensure!(
                        world.report().is_success() == expected,
                        "[{}] expected is_success = {}, report: {:?}",
                        self.name,
                        expected,
                        world.report()
                    );
                }
                Step::AssertFailedProjects(count) => {
                    let failed = world.report().failed_projects().count();
                    ensure!(
                        failed == count,
                        "[{}] expected {} failed projects, got {}",
                        self.name,
                        count,
                        failed
                    );
                }
                Step::AssertProjectStatus {
                    workspace,
                    project,
                    status,
                } => {
                    let id = ProjectId::new(workspace, project);
                    let context = world
                        .layout
                        .load_project_context(&id)?
                        .context("project context missing")?;
                    ensure!(
                        context.summary.status == status,
                        "[{}] {} status {:?}, expected {:?}",
                        self.name,
                        id,
                        context.summary.status,
                        status
                    );
                }
                Step::AssertUserMemories(expected) => {
                    let store = world.user_store()?;
                    let contents: Vec<&str> =
                        store.memories.iter().map(|m| m.content.as_str()).collect();
                    ensure!(
                        contents == expected,
                        "[{}] user memories {:?}, expected {:?}",
                        self.name,
                        contents,
                        expected
                    );
                }
                Step::AssertRecentOrder(expected) => {
                    let store = world.user_store()?;
                    let contents: Vec<&str> = store
                        .quick_reference
                        .recent_memories
                        .iter()
                        .map(|m| m.content.as_str())
                        .collect();
                    ensure!(
                        contents == expected,
                        "[{}] recent memories {:?}, expected {:?}",
                        self.name,
                        contents,
                        expected
                    );
                }
                Step::AssertWorkspaceMemories { workspace, count } => {
                    let store = world
                        .layout
                        .load_workspace_store(&workspace)?
                        .context("workspace store missing")?;
                    ensure!(
                        store.memories.len() == count,
                        "[{}] workspace {} holds {} memories, expected {}",
                        self.name,
                        workspace,
                        store.memories.len(),
                        count
                    );
                }
                Step::AssertValidateClean(expected) => {
                    let report = validate(&world.layout, &world.config)?;
                    ensure!(
                        report.is_clean() == expected,
                        "[{}] expected is_clean = {}, got: {}",
                        self.name,
                        expected,
                        report.summary()
                    );
                }
                Step::AssertOutdatedReason { scope, contains } => {
                    let report = validate(&world.layout, &world.config)?;
                    let check = report
                        .outdated()
                        .find(|c| c.scope == scope)
                        .with_context(|| format!("scope {} not reported outdated", scope))?;
                    let reason = check.reason.as_deref().unwrap_or("");
                    ensure!(
                        reason.contains(&contains),
                        "[{}] reason {:?} does not mention {:?}",
                        self.name,
                        reason,
                        contains
                    );
                }
            }
        }
        Ok(())
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
