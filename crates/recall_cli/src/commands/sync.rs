//! Sync pass command.

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use recall_core::{Config, Layout, SyncOptions, SyncReport, Syncer, SystemClock};
use std::path::Path;
use std::sync::Arc;

/// Run one sync pass, with optional workspace and project filters.
pub fn run(root: &Path, scope: Option<String>, project: Option<String>) -> Result<()> {
    let config = Config::load(root)?;
    let layout = Layout::open(root)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message("Syncing project documents...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let syncer = Syncer::new(layout, config, Arc::new(SystemClock));
    let report = syncer
        .run(&SyncOptions {
            workspace: scope,
            project,
        })
        .context("Sync pass failed")?;

    spinner.finish_and_clear();
    print_report(&report);

    if !report.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_report(report: &SyncReport) {
    println!();
    println!("{}", style("Sync Report:").bold());

    for outcome in &report.projects {
        match (&outcome.error, outcome.status) {
            (Some(error), _) => {
                println!("  {} {}  {}", style("×").red(), outcome.id, style(error).red());
            }
            (None, status) => {
                let status = status
                    .map(|s| format!("{:?}", s).to_lowercase())
                    .unwrap_or_default();
                println!(
                    "  {} {}  [{}] {} memories",
                    style("✓").green(),
                    outcome.id,
                    style(status).cyan(),
                    outcome.memories_extracted
                );
            }
        }
    }

    println!();
    println!(
        "  Workspaces updated: {}",
        style(report.workspaces_updated.len()).cyan()
    );
    println!(
        "  User store updated: {}",
        style(report.user_updated).cyan()
    );
    println!(
        "  Memories merged:    {}",
        style(report.memories_merged).cyan()
    );
    println!(
        "  Memories pruned:    {}",
        style(report.memories_pruned).cyan()
    );

    for error in &report.hard_errors {
        println!("  {} {}", style("×").red(), style(error).red());
    }

    println!();
    if report.is_success() {
        println!("{} {}", style("✓").green(), style("sync complete").green());
    } else {
        println!(
            "{}",
            style("sync finished with errors").yellow().bold()
        );
        println!(
            "  {} Fix the failures above and re-run {}",
            style("→").cyan(),
            style("recall sync").cyan()
        );
    }
}
