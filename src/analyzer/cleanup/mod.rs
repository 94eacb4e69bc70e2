//! Namespace Cleanup Analyzer
//!
//! Finds Kubernetes resources in one namespace that look unused, orphaned or
//! stale, and optionally deletes them.
//!
//! # Stages
//!
//! 1. **Collect** - list the scanned kinds from a [`ResourceSource`] into an
//!    [`Inventory`]; a failed listing is kept as a warning, not dropped
//! 2. **Index** - record every Secret and ConfigMap named by a Deployment,
//!    StatefulSet or DaemonSet pod template
//! 3. **Classify** - apply the per-kind rules of a [`RuleSet`] and emit a
//!    [`Report`] in scan order
//! 4. **Purge** (optional) - delete each reported resource, best-effort
//!
//! # Example
//!
//! ```rust,ignore
//! use kubectl_cleaner::analyzer::cleanup::{ManifestSource, RuleSet, analyze_namespace};
//!
//! let source = ManifestSource::from_path(Path::new("dump.yaml"), "shop")?;
//! let rules = RuleSet::new().with_older_than_days(30).with_orphaned_secrets_only(true);
//! let report = analyze_namespace(&source, &rules, chrono::Utc::now()).await;
//!
//! for resource in report.iter() {
//!     println!("{}", resource);
//! }
//! ```

/// Rule set and tri-state rule helpers.
pub mod rules;

/// Core data types.
pub mod types;

/// Observed object snapshots.
pub mod object;

/// Wire-form decoding.
pub mod parser;

/// Secret/ConfigMap reference index.
pub mod references;

/// Per-kind predicates.
pub mod classifier;

/// Listing sources (cluster, manifest dump).
pub mod source;

/// Collect, index, classify.
pub mod pipeline;

/// Best-effort deletion.
pub mod deleter;

/// Output formatting (table, JSON).
pub mod formatter;

pub use classifier::Classifier;
pub use deleter::{failure_count, purge};
pub use formatter::{OutputFormat, format_purge, format_purge_refused, format_report};
pub use object::Inventory;
pub use pipeline::{analyze_namespace, classify, collect};
pub use references::ReferenceIndex;
pub use rules::RuleSet;
pub use source::{
    ClusterSource, ManifestSource, NamespaceSource, ResourceDeleter, ResourceSource, SourceError,
};
pub use types::{DeletionOutcome, ListingFailure, Report, Resource, ResourceKind};
