//! Observed snapshots of namespace objects.
//!
//! These carry only what the classifier and the reference index read. All
//! fields are optional because the wire form omits zero values and may be
//! partially populated; see `parser` for how they are filled.

use crate::analyzer::cleanup::types::{ListingFailure, ResourceKind};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Metadata shared by every observed object.
#[derive(Debug, Clone, Default)]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: Option<String>,
    pub creation_timestamp: Option<DateTime<Utc>>,
    pub labels: BTreeMap<String, String>,
}

impl ObjectMeta {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn created_at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.creation_timestamp = Some(timestamp);
        self
    }

    /// Whole days elapsed since creation, truncated.
    ///
    /// `None` when the creation timestamp is missing or unparseable.
    pub fn age_days(&self, now: DateTime<Utc>) -> Option<i64> {
        self.creation_timestamp
            .map(|created| now.signed_duration_since(created).num_days())
    }
}

/// A Secret or ConfigMap reference from a volume.
#[derive(Debug, Clone, Default)]
pub struct Volume {
    pub name: String,
    /// `secret.secretName`
    pub secret: Option<String>,
    /// `configMap.name`
    pub config_map: Option<String>,
}

/// One `envFrom` entry.
#[derive(Debug, Clone, Default)]
pub struct EnvFromSource {
    pub secret_ref: Option<String>,
    pub config_map_ref: Option<String>,
}

/// Where an env var's value comes from.
#[derive(Debug, Clone)]
pub enum EnvVarSource {
    SecretKeyRef { name: String, key: String },
    ConfigMapKeyRef { name: String, key: String },
}

#[derive(Debug, Clone, Default)]
pub struct EnvVar {
    pub name: String,
    pub value_from: Option<EnvVarSource>,
}

#[derive(Debug, Clone, Default)]
pub struct Container {
    pub name: String,
    pub env_from: Vec<EnvFromSource>,
    pub env: Vec<EnvVar>,
}

/// Pod template spec (simplified).
#[derive(Debug, Clone, Default)]
pub struct PodSpec {
    pub containers: Vec<Container>,
    pub init_containers: Vec<Container>,
    pub volumes: Vec<Volume>,
}

impl PodSpec {
    /// Regular and init containers.
    pub fn all_containers(&self) -> impl Iterator<Item = &Container> {
        self.containers.iter().chain(self.init_containers.iter())
    }
}

/// Deployment, StatefulSet or DaemonSet.
#[derive(Debug, Clone, Default)]
pub struct WorkloadInfo {
    pub meta: ObjectMeta,
    /// `status.replicas`; absent on the wire when zero
    pub replicas: Option<i64>,
    pub pod_spec: Option<PodSpec>,
}

#[derive(Debug, Clone, Default)]
pub struct ServiceInfo {
    pub meta: ObjectMeta,
    pub selector: BTreeMap<String, String>,
    /// Whether any Pod matches `selector`; `None` when unknown
    pub has_matching_pods: Option<bool>,
}

impl ServiceInfo {
    pub fn has_selector(&self) -> bool {
        !self.selector.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CronJobInfo {
    pub meta: ObjectMeta,
}

#[derive(Debug, Clone, Default)]
pub struct JobInfo {
    pub meta: ObjectMeta,
    pub succeeded: Option<i64>,
    pub failed: Option<i64>,
}

impl JobInfo {
    /// A Job is finished once any pod succeeded or failed.
    pub fn is_finished(&self) -> bool {
        self.succeeded.unwrap_or(0) > 0 || self.failed.unwrap_or(0) > 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct PvcInfo {
    pub meta: ObjectMeta,
    pub phase: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SecretInfo {
    pub meta: ObjectMeta,
    pub secret_type: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMapInfo {
    pub meta: ObjectMeta,
}

/// Access to the metadata of any observed snapshot.
pub trait HasMeta {
    fn meta(&self) -> &ObjectMeta;
}

macro_rules! impl_has_meta {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl HasMeta for $ty {
                fn meta(&self) -> &ObjectMeta {
                    &self.meta
                }
            }
        )+
    };
}

impl_has_meta!(
    WorkloadInfo,
    ServiceInfo,
    CronJobInfo,
    JobInfo,
    PvcInfo,
    SecretInfo,
    ConfigMapInfo,
);

/// Either the listed items of one kind or why they could not be listed.
pub type Listing<T> = Result<Vec<T>, ListingFailure>;

/// Everything observed in one namespace, one listing per kind.
#[derive(Debug, Clone)]
pub struct Inventory {
    pub namespace: String,
    pub deployments: Listing<WorkloadInfo>,
    pub stateful_sets: Listing<WorkloadInfo>,
    pub daemon_sets: Listing<WorkloadInfo>,
    pub services: Listing<ServiceInfo>,
    pub cron_jobs: Listing<CronJobInfo>,
    pub jobs: Listing<JobInfo>,
    pub pvcs: Listing<PvcInfo>,
    pub secrets: Listing<SecretInfo>,
    pub config_maps: Listing<ConfigMapInfo>,
    /// Selector lookups that failed while resolving Service orphan status
    pub selector_failures: Vec<ListingFailure>,
}

impl Inventory {
    /// An inventory with every listing present and empty.
    pub fn empty(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            deployments: Ok(Vec::new()),
            stateful_sets: Ok(Vec::new()),
            daemon_sets: Ok(Vec::new()),
            services: Ok(Vec::new()),
            cron_jobs: Ok(Vec::new()),
            jobs: Ok(Vec::new()),
            pvcs: Ok(Vec::new()),
            secrets: Ok(Vec::new()),
            config_maps: Ok(Vec::new()),
            selector_failures: Vec::new(),
        }
    }

    /// Pod templates of every listed workload, in scan order.
    pub fn workload_pod_specs(&self) -> impl Iterator<Item = &PodSpec> {
        [&self.deployments, &self.stateful_sets, &self.daemon_sets]
            .into_iter()
            .flat_map(|listing| items(listing))
            .filter_map(|workload| workload.pod_spec.as_ref())
    }

    /// Failed listings in scan order, followed by selector lookup failures.
    pub fn failures(&self) -> Vec<ListingFailure> {
        let listings = [
            self.deployments.as_ref().err(),
            self.stateful_sets.as_ref().err(),
            self.daemon_sets.as_ref().err(),
            self.services.as_ref().err(),
            self.cron_jobs.as_ref().err(),
            self.jobs.as_ref().err(),
            self.pvcs.as_ref().err(),
            self.secrets.as_ref().err(),
            self.config_maps.as_ref().err(),
        ];

        listings
            .into_iter()
            .flatten()
            .chain(self.selector_failures.iter())
            .cloned()
            .collect()
    }

    /// True when any workload listing failed, which leaves the reference index partial.
    pub fn has_partial_references(&self) -> bool {
        self.failures().iter().any(|failure| failure.kind.is_workload())
    }
}

/// Items of a listing; a failed listing contributes nothing.
pub fn items<T>(listing: &Listing<T>) -> &[T] {
    listing.as_deref().unwrap_or_default()
}

/// A failed listing of `kind`.
pub fn failed<T>(kind: ResourceKind, message: impl Into<String>) -> Listing<T> {
    Err(ListingFailure::new(kind, message))
}
