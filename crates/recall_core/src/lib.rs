//! Recall Core Library
//!
//! A context synchronization engine for plain-text project knowledge:
//! - Heuristic parsing of hand-edited plan / status / task documents
//! - Per-project aggregation into a derived context artifact
//! - Memory extraction, merging, and retention pruning
//! - Materialized quick references at workspace and user scope
//! - Staleness validation of every derived artifact
//!
//! Markdown stays the source of truth; every JSON artifact the engine
//! writes is a regenerable cache.
//!
//! # Quick Start
//!
//! ```
//! use recall_core::{parse_tasks, TaskStatus};
//!
//! let tasks = parse_tasks("- [x] wire the parser\n- [ ] ship v1 [high] @ana\n");
//! let counts = tasks.counts();
//! assert_eq!(counts.completed, 1);
//! assert_eq!(counts.pending, 1);
//! ```
//!
//! # Running a sync pass
//!
//! ```
//! use recall_core::{Config, Layout, SyncOptions, Syncer, SystemClock};
//! use std::sync::Arc;
//! use tempfile::TempDir;
//!
//! let tmp = TempDir::new().unwrap();
//! let config = Config::new("ana");
//! let layout = Layout::new(tmp.path());
//! layout.ensure_structure(&config.user).unwrap();
//!
//! let syncer = Syncer::new(layout, config, Arc::new(SystemClock));
//! let report = syncer.run(&SyncOptions::default()).unwrap();
//! assert!(report.is_success());
//! ```

mod aggregate;
mod clock;
mod config;
mod error;
mod extract;
mod merge;
mod parse;
mod prune;
mod quickref;
mod store;
mod sync;
mod types;
mod validate;

pub use aggregate::{aggregate_project, derive_status};
pub use clock::{Clock, SystemClock};
pub use config::{Config, LimitsConfig, RetentionConfig, CONFIG_FILE};
pub use error::{RecallError, Result};
pub use extract::{extract_note_memories, extract_project_memories};
pub use merge::merge_memories;
pub use parse::{parse_note, parse_plan, parse_status, parse_tasks, NoteInput};
pub use prune::prune_memories;
pub use quickref::{
    build_quick_reference, project_context_rel_path, workspace_store_rel_path, ScopeActivity,
};
pub use store::{Layout, ProjectDocs, SourceDoc, NOTE_INPUT_FILE};
pub use sync::{ProjectOutcome, SyncOptions, SyncReport, Syncer};
pub use types::*;
pub use validate::{validate, ScopeCheck, ValidationReport};
