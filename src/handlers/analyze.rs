//! Handler for the `analyze` command.
//!
//! Reports potentially removable resources and never modifies the cluster.

use super::utils::CleanupOptions;
use crate::analyzer::cleanup::{analyze_namespace, format_report};
use crate::error::Result;
use chrono::Utc;

/// Handle the `analyze` command.
pub async fn handle_analyze(options: CleanupOptions) -> Result<()> {
    let rules = options.resolve_rules()?;
    let source = options.open_source().await?;

    let report = analyze_namespace(&source, &rules, Utc::now()).await;
    print!("{}", format_report(&report, options.format));

    Ok(())
}
