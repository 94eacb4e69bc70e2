//! Handler for the `purge` command.
//!
//! Runs the same analysis as `analyze`, then deletes every flagged resource
//! unless dry-run is on. Deletion is refused when the analysis could not
//! list every kind.

use super::utils::CleanupOptions;
use crate::analyzer::cleanup::{
    analyze_namespace, failure_count, format_purge, format_purge_refused, purge,
};
use crate::error::{CleanerError, Result};
use chrono::Utc;

/// Handle the `purge` command.
pub async fn handle_purge(options: CleanupOptions) -> Result<()> {
    if !options.dry_run && options.is_offline() {
        return Err(CleanerError::OfflinePurge);
    }

    let rules = options.resolve_rules()?;
    let source = options.open_source().await?;
    let report = analyze_namespace(&source, &rules, Utc::now()).await;

    if options.dry_run || report.is_empty() {
        print!("{}", format_purge(&report, &[], options.dry_run, options.format));
        return Ok(());
    }

    if !report.is_complete() {
        print!("{}", format_purge_refused(&report, options.format));
        return Err(CleanerError::IncompleteReport {
            warnings: report.warnings.len(),
        });
    }

    let cluster = source.cluster().ok_or(CleanerError::OfflinePurge)?;
    log::info!("deleting {} resource(s) from {}", report.len(), report.namespace);
    let outcomes = purge(cluster, &report).await;
    print!("{}", format_purge(&report, &outcomes, false, options.format));

    let failed = failure_count(&outcomes);
    if failed > 0 {
        return Err(CleanerError::DeletionFailed {
            failed,
            total: outcomes.len(),
        });
    }

    Ok(())
}
