//! Staleness validation command.

use anyhow::{Context, Result};
use console::style;
use recall_core::{validate, Config, Layout};
use std::path::Path;

/// Check every derived artifact against its sources. Read-only.
pub fn run(root: &Path, verbose: bool) -> Result<()> {
    let config = Config::load(root)?;
    let layout = Layout::open(root)?;

    let report = validate(&layout, &config).context("Validation failed")?;

    println!("{}", style("Validation Report:").bold());
    for check in &report.checks {
        if check.ok {
            if verbose {
                println!("  {} {}", style("✓").green(), check.scope);
            }
        } else {
            println!(
                "  {} {}  {}",
                style("×").red(),
                check.scope,
                style(check.reason.as_deref().unwrap_or("outdated")).yellow()
            );
        }
    }

    println!();
    if report.is_clean() {
        println!("{} {}", style("✓").green(), style(report.summary()).green());
    } else {
        println!("{}", style(report.summary()).yellow().bold());
        println!(
            "  {} Run {} to regenerate outdated artifacts",
            style("→").cyan(),
            style("recall sync").cyan()
        );
        std::process::exit(1);
    }
    Ok(())
}
