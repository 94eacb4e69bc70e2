//! Live cluster source backed by the `kube` client.
//!
//! # Prerequisites
//!
//! - Valid kubeconfig (uses the current context or a named one)
//! - RBAC permissions to list the scanned kinds and Pods in the namespace
//! - Delete permission for `purge` without dry-run

use super::{ResourceDeleter, ResourceSource, SourceError, label_selector};
use crate::analyzer::cleanup::types::{Resource, ResourceKind};
use k8s_openapi::NamespaceResourceScope;
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::api::batch::v1::{CronJob, Job};
use k8s_openapi::api::core::v1::{ConfigMap, PersistentVolumeClaim, Pod, Secret, Service};
use kube::{
    Client, Config, Resource as KubeResource,
    api::{Api, DeleteParams, ListParams},
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Namespace-scoped view of a live cluster.
pub struct ClusterSource {
    client: Client,
    namespace: String,
}

impl ClusterSource {
    /// Connect using the default kubeconfig, or a named context when given.
    pub async fn connect(context: Option<&str>, namespace: &str) -> Result<Self, SourceError> {
        // kube's rustls stack needs a process-wide crypto provider
        let _ = rustls::crypto::ring::default_provider().install_default();

        let config = match context {
            Some(context) => {
                let kubeconfig = kube::config::Kubeconfig::read()?;
                Config::from_custom_kubeconfig(
                    kubeconfig,
                    &kube::config::KubeConfigOptions {
                        context: Some(context.to_string()),
                        ..Default::default()
                    },
                )
                .await?
            }
            None => Config::infer().await?,
        };

        let client = Client::try_from(config)?;
        log::info!(
            "connected to cluster (context: {}, namespace: {})",
            context.unwrap_or("current"),
            namespace
        );

        Ok(Self {
            client,
            namespace: namespace.to_string(),
        })
    }

    fn api<K>(&self) -> Api<K>
    where
        K: KubeResource<Scope = NamespaceResourceScope, DynamicType = ()>,
    {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    async fn list_as_values<K>(&self, kind: ResourceKind) -> Result<Vec<Value>, SourceError>
    where
        K: KubeResource<Scope = NamespaceResourceScope, DynamicType = ()>
            + Clone
            + DeserializeOwned
            + Serialize
            + Debug,
    {
        let list = self.api::<K>().list(&ListParams::default()).await?;
        log::debug!("listed {} {} object(s)", list.items.len(), kind);

        list.items
            .iter()
            .map(|item| {
                serde_yaml::to_value(item).map_err(|source| SourceError::Encode { kind, source })
            })
            .collect()
    }

    async fn delete_named<K>(&self, name: &str) -> Result<(), SourceError>
    where
        K: KubeResource<Scope = NamespaceResourceScope, DynamicType = ()>
            + Clone
            + DeserializeOwned
            + Debug,
    {
        self.api::<K>().delete(name, &DeleteParams::default()).await?;
        Ok(())
    }
}

impl ResourceSource for ClusterSource {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn list(&self, kind: ResourceKind) -> Result<Vec<Value>, SourceError> {
        match kind {
            ResourceKind::Deployment => self.list_as_values::<Deployment>(kind).await,
            ResourceKind::StatefulSet => self.list_as_values::<StatefulSet>(kind).await,
            ResourceKind::DaemonSet => self.list_as_values::<DaemonSet>(kind).await,
            ResourceKind::Service => self.list_as_values::<Service>(kind).await,
            ResourceKind::CronJob => self.list_as_values::<CronJob>(kind).await,
            ResourceKind::Job => self.list_as_values::<Job>(kind).await,
            ResourceKind::Pvc => self.list_as_values::<PersistentVolumeClaim>(kind).await,
            ResourceKind::Secret => self.list_as_values::<Secret>(kind).await,
            ResourceKind::ConfigMap => self.list_as_values::<ConfigMap>(kind).await,
        }
    }

    async fn has_matching_pods(
        &self,
        selector: &BTreeMap<String, String>,
    ) -> Result<bool, SourceError> {
        let params = ListParams::default().labels(&label_selector(selector)).limit(1);
        let pods = self.api::<Pod>().list(&params).await?;
        Ok(!pods.items.is_empty())
    }
}

impl ResourceDeleter for ClusterSource {
    async fn delete(&self, resource: &Resource) -> Result<(), SourceError> {
        let name = resource.name.as_str();
        match resource.kind {
            ResourceKind::Deployment => self.delete_named::<Deployment>(name).await,
            ResourceKind::StatefulSet => self.delete_named::<StatefulSet>(name).await,
            ResourceKind::DaemonSet => self.delete_named::<DaemonSet>(name).await,
            ResourceKind::Service => self.delete_named::<Service>(name).await,
            ResourceKind::CronJob => self.delete_named::<CronJob>(name).await,
            ResourceKind::Job => self.delete_named::<Job>(name).await,
            ResourceKind::Pvc => self.delete_named::<PersistentVolumeClaim>(name).await,
            ResourceKind::Secret => self.delete_named::<Secret>(name).await,
            ResourceKind::ConfigMap => self.delete_named::<ConfigMap>(name).await,
        }
    }
}
