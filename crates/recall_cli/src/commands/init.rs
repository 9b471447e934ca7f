//! Initialize a knowledge root.

use anyhow::{bail, Context, Result};
use recall_core::{Config, Layout, CONFIG_FILE};
use std::path::Path;

/// Create the root directory skeleton and default configuration.
pub fn run(root: &Path, user: &str) -> Result<()> {
    if user.trim().is_empty() {
        bail!("--user must not be empty");
    }
    if root.join(CONFIG_FILE).exists() {
        bail!(
            "{} already exists at {}; refusing to overwrite",
            CONFIG_FILE,
            root.display()
        );
    }

    let layout = Layout::new(root);
    layout
        .ensure_structure(user)
        .context("Failed to create root layout")?;

    let config = Config::new(user);
    config
        .save(root)
        .context("Failed to write configuration")?;

    println!("Initialized knowledge root at {}", root.display());
    println!();
    println!("Directory structure:");
    println!("  workspaces/<ws>/projects/<proj>/  - plan.md, status.md, tasks.md");
    println!("  workspaces/<ws>/context.json      - derived workspace store");
    println!("  users/{}/context.json      - derived user store", user);
    println!("  context-input.md                  - optional free-form notes");
    println!();
    println!("Configuration written to {}", CONFIG_FILE);
    println!();
    println!("Add project documents, then run 'recall sync'.");

    Ok(())
}
