//! Where namespace objects come from.
//!
//! A source lists the raw objects of one kind in its namespace and answers
//! whether a label selector matches any Pod. Two implementations exist:
//!
//! - [`ClusterSource`] talks to a live cluster through `kube`
//! - [`ManifestSource`] reads a YAML dump from disk and never touches a cluster
//!
//! Objects are handed out in their wire form (`serde_yaml::Value`) and decoded
//! by `cleanup::parser`, so both sources share a single decoding path.

pub mod cluster;
pub mod manifest;

pub use cluster::ClusterSource;
pub use manifest::ManifestSource;

use crate::analyzer::cleanup::types::{Resource, ResourceKind};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::future::Future;
use std::path::PathBuf;

/// Error type for source operations.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("Failed to infer Kubernetes config: {0}")]
    InferConfig(#[from] kube::config::InferConfigError),

    #[error("Failed to read kubeconfig: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),

    #[error("Failed to encode {kind} object: {source}")]
    Encode {
        kind: ResourceKind,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to read manifest {}: {source}", path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest {origin}: {source}")]
    ManifestParse {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Lists namespace objects and resolves Service selectors.
pub trait ResourceSource {
    /// Namespace every call is scoped to.
    fn namespace(&self) -> &str;

    /// All objects of `kind` in the namespace, in listing order.
    fn list(
        &self,
        kind: ResourceKind,
    ) -> impl Future<Output = Result<Vec<Value>, SourceError>> + Send;

    /// Whether at least one Pod in the namespace carries every label in `selector`.
    fn has_matching_pods(
        &self,
        selector: &BTreeMap<String, String>,
    ) -> impl Future<Output = Result<bool, SourceError>> + Send;
}

/// Deletes flagged resources.
pub trait ResourceDeleter {
    fn delete(&self, resource: &Resource) -> impl Future<Output = Result<(), SourceError>> + Send;
}

/// Either source, chosen at runtime.
pub enum NamespaceSource {
    Cluster(ClusterSource),
    Manifest(ManifestSource),
}

impl NamespaceSource {
    /// The live cluster, when deletion is possible.
    pub fn cluster(&self) -> Option<&ClusterSource> {
        match self {
            Self::Cluster(cluster) => Some(cluster),
            Self::Manifest(_) => None,
        }
    }
}

impl ResourceSource for NamespaceSource {
    fn namespace(&self) -> &str {
        match self {
            Self::Cluster(source) => source.namespace(),
            Self::Manifest(source) => source.namespace(),
        }
    }

    async fn list(&self, kind: ResourceKind) -> Result<Vec<Value>, SourceError> {
        match self {
            Self::Cluster(source) => source.list(kind).await,
            Self::Manifest(source) => source.list(kind).await,
        }
    }

    async fn has_matching_pods(
        &self,
        selector: &BTreeMap<String, String>,
    ) -> Result<bool, SourceError> {
        match self {
            Self::Cluster(source) => source.has_matching_pods(selector).await,
            Self::Manifest(source) => source.has_matching_pods(selector).await,
        }
    }
}

/// Render a selector as a `key=value,...` label selector string.
pub fn label_selector(selector: &BTreeMap<String, String>) -> String {
    selector
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// True when `labels` contains every pair of `selector`.
pub fn selector_matches(
    selector: &BTreeMap<String, String>,
    labels: &BTreeMap<String, String>,
) -> bool {
    selector
        .iter()
        .all(|(key, value)| labels.get(key) == Some(value))
}
