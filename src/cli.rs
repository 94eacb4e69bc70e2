use crate::analyzer::cleanup::formatter;
use crate::analyzer::cleanup::rules::{RuleSet, parse_comma_list};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kubectl-cleaner")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Safe, intelligent cleanup of unused Kubernetes resources")]
#[command(long_about = "Lists workloads, Services, Jobs, PVCs, Secrets and ConfigMaps in one namespace and flags the ones matching configurable staleness or orphan rules. Analysis never modifies the cluster; purge deletes the flagged resources unless --dry-run is left on.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Kubernetes namespace
    #[arg(short, long, global = true, default_value = "default")]
    pub namespace: String,

    /// Kubeconfig context to use instead of the current one
    #[arg(long, global = true, value_name = "CONTEXT")]
    pub context: Option<String>,

    /// Read objects from a manifest dump instead of a live cluster
    #[arg(long, global = true, value_name = "FILE", conflicts_with = "context")]
    pub from_file: Option<PathBuf>,

    /// YAML file with analyzer rules
    #[arg(long, global = true, value_name = "FILE", env = "KUBECTL_CLEANER_RULES_FILE")]
    pub rules_file: Option<PathBuf>,

    /// Simulate actions only
    #[arg(
        long,
        global = true,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_value_t = true,
        default_missing_value = "true",
        action = clap::ArgAction::Set
    )]
    pub dry_run: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub rules: RuleArgs,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Report unused, orphaned or stale resources without touching them
    Analyze,

    /// Delete unused/orphaned resources (honours --dry-run, on by default)
    Purge,
}

/// Rule overrides. A flag left out keeps the rules file value.
#[derive(Args, Debug, Clone, Default)]
pub struct RuleArgs {
    /// Consider a Deployment stale if replicas <= N (negative disables this rule)
    #[arg(long, global = true, value_name = "N", allow_negative_numbers = true)]
    pub deployments_replicas: Option<i64>,

    /// Only include completed Jobs as stale
    #[arg(
        long,
        global = true,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub jobs_completed_only: Option<bool>,

    /// Comma-separated PVC phases to consider unused
    #[arg(long, global = true, value_name = "PHASES")]
    pub pvc_phases: Option<String>,

    /// Comma-separated Secret types to consider
    #[arg(long, global = true, value_name = "TYPES")]
    pub secret_types: Option<String>,

    /// Include only orphaned Services
    #[arg(
        long,
        global = true,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub orphaned_services_only: Option<bool>,

    /// Include only orphaned Secrets
    #[arg(
        long,
        global = true,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub orphaned_secrets_only: Option<bool>,

    /// Include only orphaned ConfigMaps
    #[arg(
        long,
        global = true,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub orphaned_configmaps_only: Option<bool>,

    /// Whether a Service without a selector counts as orphaned
    #[arg(
        long,
        global = true,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub selectorless_services_orphaned: Option<bool>,

    /// Mark resources as stale if older than N days (negative disables this rule)
    #[arg(long, global = true, value_name = "DAYS", allow_negative_numbers = true)]
    pub older_than: Option<i64>,
}

impl RuleArgs {
    /// Rules set on the command line. List flags that are empty after
    /// trimming count as not given.
    pub fn to_overrides(&self) -> RuleSet {
        let list = |raw: &Option<String>| {
            raw.as_deref()
                .map(parse_comma_list)
                .filter(|items| !items.is_empty())
        };

        RuleSet {
            deployment_replicas: self.deployments_replicas,
            job_completed_only: self.jobs_completed_only,
            pvc_phases: list(&self.pvc_phases),
            secret_types: list(&self.secret_types),
            orphaned_services_only: self.orphaned_services_only,
            orphaned_secrets_only: self.orphaned_secrets_only,
            orphaned_configmaps_only: self.orphaned_configmaps_only,
            selectorless_services_orphaned: self.selectorless_services_orphaned,
            older_than_days: self.older_than,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

impl From<OutputFormat> for formatter::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Table => Self::Table,
            OutputFormat::Json => Self::Json,
        }
    }
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}
