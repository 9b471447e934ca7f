//! Temporary knowledge root for one scenario.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use recall_core::{
    Clock, Config, DocKind, Layout, ProjectId, ScopeStore, SyncOptions, SyncReport, Syncer,
};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

/// A scenario's world: a temp root, its layout, and a fixed clock.
///
/// The clock sits an hour in the future so that `generatedAt` always
/// beats real file mtimes, the same relation a wall clock gives a real
/// run.
pub struct World {
    _dir: TempDir,
    pub layout: Layout,
    pub config: Config,
    pub now: DateTime<Utc>,
    pub last_report: Option<SyncReport>,
}

impl World {
    pub fn new(user: &str) -> Result<Self> {
        let dir = TempDir::new()?;
        let layout = Layout::new(dir.path());
        let config = Config::new(user);
        layout.ensure_structure(user)?;
        config.save(dir.path())?;
        Ok(Self {
            _dir: dir,
            layout,
            config,
            now: Utc::now() + Duration::hours(1),
            last_report: None,
        })
    }

    pub fn write_doc(
        &self,
        workspace: &str,
        project: &str,
        kind: DocKind,
        text: &str,
    ) -> Result<()> {
        let id = ProjectId::new(workspace, project);
        fs::create_dir_all(self.layout.project_dir(&id))?;
        fs::write(self.layout.doc_path(&id, kind), text)?;
        Ok(())
    }

    pub fn sync(&mut self, workspace: Option<&str>, project: Option<&str>) -> Result<()> {
        let clock: Arc<dyn Clock> = {
            let at = self.now;
            Arc::new(move || at)
        };
        let syncer = Syncer::new(self.layout.clone(), self.config.clone(), clock);
        let report = syncer
            .run(&SyncOptions {
                workspace: workspace.map(String::from),
                project: project.map(String::from),
            })
            .context("sync pass failed")?;
        self.last_report = Some(report);
        Ok(())
    }

    pub fn user_store(&self) -> Result<ScopeStore> {
        self.layout
            .load_user_store(&self.config.user)?
            .context("user store missing")
    }

    pub fn report(&self) -> &SyncReport {
        self.last_report.as_ref().expect("no sync pass has run yet")
    }
}
