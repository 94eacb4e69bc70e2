//! Core types for namespace cleanup analysis.
//!
//! - `ResourceKind` - The nine kinds the analyzer scans, in scan order
//! - `Resource` - A single `(kind, name)` entry flagged for removal
//! - `ListingFailure` - A kind (or selector lookup) the source could not enumerate
//! - `Report` - The ordered analysis result plus its warnings
//! - `DeletionOutcome` - The result of one purge attempt

use serde::Serialize;
use std::fmt;

/// Resource kinds the analyzer knows about.
///
/// The declaration order is the scan order: workloads first, because the
/// Secret and ConfigMap passes depend on references found in workload pod
/// templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ResourceKind {
    Deployment,
    StatefulSet,
    DaemonSet,
    Service,
    CronJob,
    Job,
    #[serde(rename = "PVC")]
    Pvc,
    Secret,
    ConfigMap,
}

impl ResourceKind {
    /// All kinds in scan order.
    pub const ALL: [ResourceKind; 9] = [
        Self::Deployment,
        Self::StatefulSet,
        Self::DaemonSet,
        Self::Service,
        Self::CronJob,
        Self::Job,
        Self::Pvc,
        Self::Secret,
        Self::ConfigMap,
    ];

    /// Short name used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deployment => "Deployment",
            Self::StatefulSet => "StatefulSet",
            Self::DaemonSet => "DaemonSet",
            Self::Service => "Service",
            Self::CronJob => "CronJob",
            Self::Job => "Job",
            Self::Pvc => "PVC",
            Self::Secret => "Secret",
            Self::ConfigMap => "ConfigMap",
        }
    }

    /// The `kind` field as it appears on API objects.
    pub fn api_kind(&self) -> &'static str {
        match self {
            Self::Pvc => "PersistentVolumeClaim",
            other => other.as_str(),
        }
    }

    /// Whether pod templates of this kind feed the reference index.
    pub fn is_workload(&self) -> bool {
        matches!(self, Self::Deployment | Self::StatefulSet | Self::DaemonSet)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A resource flagged as potentially removable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Resource {
    pub kind: ResourceKind,
    pub name: String,
}

impl Resource {
    pub fn new(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.name)
    }
}

/// A listing the source could not complete.
///
/// Recorded instead of being swallowed so that callers can tell "no
/// candidates" apart from "could not look".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingFailure {
    pub kind: ResourceKind,
    pub message: String,
}

impl ListingFailure {
    pub fn new(kind: ResourceKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ListingFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Result of analyzing one namespace.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    /// Namespace that was analyzed
    pub namespace: String,
    /// Flagged resources in scan order
    pub resources: Vec<Resource>,
    /// Listings that failed; the affected kinds may be under-reported
    pub warnings: Vec<ListingFailure>,
}

impl Report {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    pub fn push(&mut self, kind: ResourceKind, name: impl Into<String>) {
        self.resources.push(Resource::new(kind, name));
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    /// True when every listing succeeded.
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Names flagged for one kind, in listing order.
    pub fn names_of(&self, kind: ResourceKind) -> Vec<&str> {
        self.resources
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| r.name.as_str())
            .collect()
    }
}

/// Outcome of a single purge attempt.
#[derive(Debug, Clone, Serialize)]
pub struct DeletionOutcome {
    pub resource: Resource,
    /// Error message when the delete call failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeletionOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
