//! # kubectl-cleaner
//!
//! Safe, rule-driven cleanup of unused Kubernetes resources in a single
//! namespace.
//!
//! ## Features
//!
//! - **Staleness rules**: age, replica count, Job completion and PVC phase
//! - **Orphan detection**: Services without matching Pods, Secrets and
//!   ConfigMaps no workload references
//! - **Layered configuration**: YAML rules file overridden by CLI flags
//! - **Offline mode**: analyze a `kubectl get -o yaml` dump without cluster access
//! - **Safe purge**: dry-run by default, refuses to delete from a partial report

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;

pub use error::{CleanerError, Result};
pub use handlers::*;

use cli::{Cli, Commands};

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

impl From<&Cli> for CleanupOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            namespace: cli.namespace.clone(),
            context: cli.context.clone(),
            from_file: cli.from_file.clone(),
            rules_file: cli.rules_file.clone(),
            overrides: cli.rules.to_overrides(),
            dry_run: cli.dry_run,
            format: cli.output.into(),
        }
    }
}

pub async fn run_command(cli: Cli) -> Result<()> {
    let options = CleanupOptions::from(&cli);
    match cli.command {
        Commands::Analyze => handlers::handle_analyze(options).await,
        Commands::Purge => handlers::handle_purge(options).await,
    }
}
