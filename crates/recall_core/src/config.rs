//! Configuration for the sync engine.
//!
//! Lives in `recall.toml` at the knowledge root. The active user is an
//! explicit configuration value; it is never inferred by scanning the
//! filesystem for user directories.

use crate::error::{RecallError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the configuration file at the knowledge root.
pub const CONFIG_FILE: &str = "recall.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active user id. All user-level artifacts are written under this
    /// identity.
    pub user: String,

    /// Memory retention and staleness windows.
    #[serde(default)]
    pub retention: RetentionConfig,

    /// Bounds on the materialized quick reference lists.
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl Config {
    /// Creates a configuration for the given user with default windows.
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            retention: RetentionConfig::default(),
            limits: LimitsConfig::default(),
        }
    }

    /// Load configuration from `recall.toml` at the knowledge root.
    ///
    /// A missing file is an error: the active user must be configured
    /// explicitly before the engine runs.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Err(RecallError::ConfigError(format!(
                "{} not found at {}",
                CONFIG_FILE,
                root.display()
            )));
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| RecallError::ConfigError(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| RecallError::ConfigError(format!("failed to parse config: {}", e)))?;
        if config.user.trim().is_empty() {
            return Err(RecallError::ConfigError(
                "config field 'user' must not be empty".into(),
            ));
        }
        Ok(config)
    }

    /// Save configuration to `recall.toml` at the knowledge root.
    pub fn save(&self, root: &Path) -> Result<()> {
        let path = root.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self)
            .map_err(|e| RecallError::ConfigError(format!("failed to serialize config: {}", e)))?;
        fs::write(&path, content)
            .map_err(|e| RecallError::ConfigError(format!("failed to write config: {}", e)))?;
        Ok(())
    }
}

/// Retention rules and activity windows, in days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Archived memories older than this are pruned (default: 30).
    pub archived_days: u32,

    /// Low-relevance memories older than this are pruned (default: 14).
    pub low_relevance_days: u32,

    /// A project with no source activity for longer than this is
    /// considered paused (default: 30).
    pub pause_after_days: u32,

    /// Sub-scopes with activity within this window count as active in
    /// the quick reference (default: 7).
    pub active_window_days: u32,

    /// Tag ranking counts occurrences across memories updated within
    /// this window (default: 30).
    pub tag_window_days: u32,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            archived_days: 30,
            low_relevance_days: 14,
            pause_after_days: 30,
            active_window_days: 7,
            tag_window_days: 30,
        }
    }
}

/// Bounds on quick reference lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Most-recently-updated active memories to keep (default: 20).
    pub recent_memories: usize,

    /// Referenced files to keep (default: 30).
    pub recent_files: usize,

    /// Frequency-ranked tags to keep (default: 10).
    pub recent_tags: usize,

    /// Display entries per category in a project quick reference
    /// (default: 5).
    pub display_entries: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            recent_memories: 20,
            recent_files: 30,
            recent_tags: 10,
            display_entries: 5,
        }
    }
}
