//! Error types for recall_core operations.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for recall_core operations.
#[derive(Error, Debug)]
pub enum RecallError {
    /// Configuration error (loading, parsing, invalid values).
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// The knowledge root does not exist or is not initialized.
    #[error("knowledge root not initialized at {}", path.display())]
    RootNotInitialized {
        /// Path that was expected to hold the root layout
        path: PathBuf,
    },

    /// A persisted JSON artifact could not be read or decoded.
    #[error("malformed artifact at {}: {}", path.display(), reason)]
    MalformedArtifact {
        /// Path to the artifact
        path: PathBuf,
        /// Description of what could not be decoded
        reason: String,
    },

    /// Serialization of an artifact failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// No workspace with the given name exists under the root.
    #[error("workspace not found: {0}")]
    WorkspaceNotFound(String),

    /// No project with the given name exists in the workspace.
    #[error("project not found: {workspace}/{project}")]
    ProjectNotFound {
        /// Workspace that was searched
        workspace: String,
        /// Project name that was not found
        project: String,
    },

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RecallError {
    /// Returns a user-friendly recovery suggestion for the error, if available.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::RootNotInitialized { .. } => {
                Some("Run 'recall init --user <name>' to create the root layout.")
            }
            Self::ConfigError(_) => {
                Some("Check recall.toml at the knowledge root, or recreate it with 'recall init'.")
            }
            Self::MalformedArtifact { .. } => {
                Some("Derived JSON is a regenerable cache. Delete the file and run 'recall sync'.")
            }
            Self::WorkspaceNotFound(_) | Self::ProjectNotFound { .. } => {
                Some("Run 'recall sync' without filters to see what is discovered.")
            }
            _ => None,
        }
    }
}

/// Convenience Result type for recall_core operations.
pub type Result<T> = std::result::Result<T, RecallError>;
