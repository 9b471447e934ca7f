//! Recall CLI - Command-line interface for the context sync engine.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "recall")]
#[command(about = "Sync hand-edited project documents into derived context stores", long_about = None)]
#[command(version)]
struct Cli {
    /// Knowledge root directory
    #[arg(long, default_value = ".", global = true)]
    root: std::path::PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a knowledge root
    Init {
        /// User id that owns the user-level store
        #[arg(long)]
        user: String,
    },
    /// Run a sync pass over the root
    Sync {
        /// Restrict the pass to one workspace
        #[arg(long)]
        scope: Option<String>,
        /// Restrict the pass to projects with this name
        #[arg(long)]
        project: Option<String>,
    },
    /// Check derived artifacts for staleness (read-only)
    Validate {
        /// Also list scopes that are in sync
        #[arg(long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    // Initialize tracing subscriber
    // Respects RUST_LOG environment variable (e.g., RUST_LOG=debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { user } => commands::init::run(&cli.root, &user),
        Commands::Sync { scope, project } => commands::sync::run(&cli.root, scope, project),
        Commands::Validate { verbose } => commands::validate::run(&cli.root, verbose),
    }
}
