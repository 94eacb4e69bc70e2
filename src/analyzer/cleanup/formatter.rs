//! Output formatting for cleanup reports.
//!
//! Supports a human-readable table and JSON.

use crate::analyzer::cleanup::types::{DeletionOutcome, ListingFailure, Report, Resource};
use colored::Colorize;
use serde::Serialize;

// ============================================================================
// Output Format
// ============================================================================

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain listing (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

const NOTHING_FOUND: &str = "No unused, orphaned, or stale resources found.";

// ============================================================================
// Analyze
// ============================================================================

/// Format an analysis report.
pub fn format_report(report: &Report, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => format_report_table(report),
        OutputFormat::Json => format_json(report),
    }
}

fn format_report_table(report: &Report) -> String {
    let mut output = format_warnings(&report.warnings);

    if report.is_empty() {
        output.push_str(NOTHING_FOUND);
        output.push('\n');
        return output;
    }

    output.push_str(&format!("{}\n", "Potentially removable resources:".bold()));
    for resource in report.iter() {
        output.push_str(&format_entry(resource.kind.as_str(), &resource.name));
    }
    output.push_str(&format!(
        "\n{}\n",
        "(Dry-run only. No resources have been deleted.)".dimmed()
    ));
    output
}

// ============================================================================
// Purge
// ============================================================================

/// Everything a purge run did, for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct PurgeSummary<'a> {
    pub namespace: &'a str,
    pub dry_run: bool,
    /// Deletion was refused because the report is incomplete
    pub refused: bool,
    pub resources: &'a [Resource],
    /// Empty for a dry run
    pub outcomes: &'a [DeletionOutcome],
    pub warnings: &'a [ListingFailure],
}

/// Format the result of a purge run.
///
/// `outcomes` is empty for a dry run; otherwise it holds one entry per
/// report resource, in report order.
pub fn format_purge(
    report: &Report,
    outcomes: &[DeletionOutcome],
    dry_run: bool,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Table => format_purge_table(report, outcomes, dry_run),
        OutputFormat::Json => format_json(&PurgeSummary {
            namespace: &report.namespace,
            dry_run,
            refused: false,
            resources: &report.resources,
            outcomes,
            warnings: &report.warnings,
        }),
    }
}

/// Format a purge that was refused before any deletion.
///
/// The table form is the analysis report; JSON keeps the purge summary shape.
pub fn format_purge_refused(report: &Report, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => format_report_table(report),
        OutputFormat::Json => format_json(&PurgeSummary {
            namespace: &report.namespace,
            dry_run: false,
            refused: true,
            resources: &report.resources,
            outcomes: &[],
            warnings: &report.warnings,
        }),
    }
}

fn format_purge_table(report: &Report, outcomes: &[DeletionOutcome], dry_run: bool) -> String {
    let mut output = format_warnings(&report.warnings);

    if report.is_empty() {
        output.push_str(NOTHING_FOUND);
        output.push('\n');
        return output;
    }

    output.push_str(&format!(
        "{}\n",
        format!("Deleting {} resources:", report.len()).bold()
    ));
    for (i, resource) in report.iter().enumerate() {
        output.push_str(&format_entry(resource.kind.as_str(), &resource.name));
        if let Some(error) = outcomes.get(i).and_then(|o| o.error.as_deref()) {
            output.push_str(&format!("  {} {}\n", "ERROR:".red().bold(), error));
        }
    }

    if dry_run {
        output.push_str(&format!(
            "\n{}\n",
            "Dry-run mode: no resources were actually deleted.".yellow()
        ));
    } else {
        output.push_str(&format!("\n{}\n", "Purge complete.".green()));
    }
    output
}

// ============================================================================
// Shared
// ============================================================================

fn format_entry(kind: &str, name: &str) -> String {
    format!("- {:<12} {}\n", kind, name)
}

fn format_warnings(warnings: &[ListingFailure]) -> String {
    let mut output = String::new();
    for warning in warnings {
        output.push_str(&format!("{} {}\n", "WARNING:".yellow().bold(), warning));
    }
    if !warnings.is_empty() {
        output.push_str(&format!(
            "{}\n\n",
            "Results may be incomplete for the kinds above.".yellow()
        ));
    }
    output
}

fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}
