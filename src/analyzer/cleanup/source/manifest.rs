//! Offline source reading a manifest dump.
//!
//! Accepts the output of `kubectl get ... -o yaml` (a `kind: List`), plain
//! multi-document YAML, or JSON. Objects whose `metadata.namespace` names a
//! different namespace are dropped; objects without a namespace are kept.
//! Pods in the dump answer selector lookups.

use super::{ResourceSource, SourceError, selector_matches};
use crate::analyzer::cleanup::parser::{object_kind, parse_metadata};
use crate::analyzer::cleanup::types::ResourceKind;
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Namespace view over objects loaded from a file.
#[derive(Debug, Clone)]
pub struct ManifestSource {
    namespace: String,
    objects: Vec<Value>,
}

impl ManifestSource {
    /// Load a manifest file.
    pub fn from_path(path: &Path, namespace: &str) -> Result<Self, SourceError> {
        let content = std::fs::read_to_string(path).map_err(|source| SourceError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_with_origin(&content, namespace, &path.display().to_string())
    }

    /// Parse manifest content held in memory.
    pub fn parse(content: &str, namespace: &str) -> Result<Self, SourceError> {
        Self::parse_with_origin(content, namespace, "<memory>")
    }

    fn parse_with_origin(
        content: &str,
        namespace: &str,
        origin: &str,
    ) -> Result<Self, SourceError> {
        let mut objects = Vec::new();

        for document in serde_yaml::Deserializer::from_str(content) {
            let value = Value::deserialize(document).map_err(|source| SourceError::ManifestParse {
                origin: origin.to_string(),
                source,
            })?;
            flatten_into(value, &mut objects);
        }

        let total = objects.len();
        objects.retain(|object| in_namespace(object, namespace));
        log::info!(
            "loaded {} object(s) from {} ({} in namespace {})",
            total,
            origin,
            objects.len(),
            namespace
        );

        Ok(Self {
            namespace: namespace.to_string(),
            objects,
        })
    }

    fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.objects
            .iter()
            .filter(move |object| object_kind(object) == Some(kind))
    }
}

/// Push `value` into `out`, expanding `kind: List` wrappers.
fn flatten_into(value: Value, out: &mut Vec<Value>) {
    if value.is_null() {
        return;
    }

    if object_kind(&value) == Some("List") {
        if let Some(items) = value.get("items").and_then(Value::as_sequence) {
            for item in items {
                flatten_into(item.clone(), out);
            }
        }
        return;
    }

    out.push(value);
}

fn in_namespace(object: &Value, namespace: &str) -> bool {
    match parse_metadata(object).namespace {
        Some(ns) => ns == namespace,
        None => true,
    }
}

impl ResourceSource for ManifestSource {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn list(&self, kind: ResourceKind) -> Result<Vec<Value>, SourceError> {
        Ok(self.of_kind(kind.api_kind()).cloned().collect())
    }

    async fn has_matching_pods(
        &self,
        selector: &BTreeMap<String, String>,
    ) -> Result<bool, SourceError> {
        Ok(self
            .of_kind("Pod")
            .any(|pod| selector_matches(selector, &parse_metadata(pod).labels)))
    }
}
