//! Secret and ConfigMap references held by workload pod templates.
//!
//! A Secret or ConfigMap is considered in use when any Deployment,
//! StatefulSet or DaemonSet template mentions it through a volume, an
//! `envFrom` entry or an env var `valueFrom` key reference.

use crate::analyzer::cleanup::object::{EnvVarSource, PodSpec};
use std::collections::BTreeSet;

/// Names referenced by workloads, per referenceable kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceIndex {
    secrets: BTreeSet<String>,
    config_maps: BTreeSet<String>,
}

impl ReferenceIndex {
    /// Build the index from a set of pod templates.
    pub fn build<'a>(specs: impl IntoIterator<Item = &'a PodSpec>) -> Self {
        let mut index = Self::default();
        for spec in specs {
            index.add_pod_spec(spec);
        }
        log::debug!(
            "reference index: {} secret(s), {} configmap(s)",
            index.secrets.len(),
            index.config_maps.len()
        );
        index
    }

    /// Record every Secret and ConfigMap the pod template references.
    pub fn add_pod_spec(&mut self, spec: &PodSpec) {
        for volume in &spec.volumes {
            if let Some(name) = &volume.secret {
                self.secrets.insert(name.clone());
            }
            if let Some(name) = &volume.config_map {
                self.config_maps.insert(name.clone());
            }
        }

        for container in spec.all_containers() {
            for source in &container.env_from {
                if let Some(name) = &source.config_map_ref {
                    self.config_maps.insert(name.clone());
                }
                if let Some(name) = &source.secret_ref {
                    self.secrets.insert(name.clone());
                }
            }

            for var in &container.env {
                match &var.value_from {
                    Some(EnvVarSource::ConfigMapKeyRef { name, .. }) => {
                        self.config_maps.insert(name.clone());
                    }
                    Some(EnvVarSource::SecretKeyRef { name, .. }) => {
                        self.secrets.insert(name.clone());
                    }
                    None => {}
                }
            }
        }
    }

    pub fn is_secret_referenced(&self, name: &str) -> bool {
        self.secrets.contains(name)
    }

    pub fn is_config_map_referenced(&self, name: &str) -> bool {
        self.config_maps.contains(name)
    }

}
