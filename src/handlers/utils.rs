//! Shared handler plumbing: options, rule resolution and source selection.

use crate::analyzer::cleanup::formatter::OutputFormat;
use crate::analyzer::cleanup::rules::RuleSet;
use crate::analyzer::cleanup::source::{ClusterSource, ManifestSource, NamespaceSource};
use crate::config;
use crate::error::Result;
use std::path::PathBuf;

/// Configuration shared by the `analyze` and `purge` commands.
#[derive(Debug, Clone)]
pub struct CleanupOptions {
    /// Target namespace
    pub namespace: String,
    /// Kubeconfig context (current context when unset)
    pub context: Option<String>,
    /// Manifest dump to read instead of a live cluster
    pub from_file: Option<PathBuf>,
    /// Rules file
    pub rules_file: Option<PathBuf>,
    /// Rules given on the command line
    pub overrides: RuleSet,
    /// Simulate deletions only
    pub dry_run: bool,
    /// Output format
    pub format: OutputFormat,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
            context: None,
            from_file: None,
            rules_file: None,
            overrides: RuleSet::default(),
            dry_run: true,
            format: OutputFormat::Table,
        }
    }
}

impl CleanupOptions {
    /// Rules file merged with command-line overrides.
    pub fn resolve_rules(&self) -> Result<RuleSet> {
        Ok(config::resolve_rules(
            self.rules_file.as_deref(),
            self.overrides.clone(),
        )?)
    }

    /// Open the manifest dump when one was given, the cluster otherwise.
    pub async fn open_source(&self) -> Result<NamespaceSource> {
        let source = match &self.from_file {
            Some(path) => {
                NamespaceSource::Manifest(ManifestSource::from_path(path, &self.namespace)?)
            }
            None => NamespaceSource::Cluster(
                ClusterSource::connect(self.context.as_deref(), &self.namespace).await?,
            ),
        };
        Ok(source)
    }

    pub fn is_offline(&self) -> bool {
        self.from_file.is_some()
    }
}
