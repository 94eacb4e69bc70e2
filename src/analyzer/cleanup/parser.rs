//! Decoding of raw API objects into observed snapshots.
//!
//! Input is the wire form of an object as a `serde_yaml::Value`, whether it
//! came from the cluster or from a manifest file. Decoding never fails:
//! missing or mistyped fields are left empty.

use crate::analyzer::cleanup::object::*;
use chrono::{DateTime, Utc};
use serde_yaml::Value;
use std::collections::BTreeMap;

// ============================================================================
// Parse helper functions
// ============================================================================

fn get_string(value: &Value, key: &str) -> Option<String> {
    value.get(key)?.as_str().map(|s| s.to_string())
}

fn get_i64(value: &Value, key: &str) -> Option<i64> {
    value.get(key)?.as_i64()
}

fn get_string_map(value: &Value, key: &str) -> BTreeMap<String, String> {
    let Some(mapping) = value.get(key).and_then(Value::as_mapping) else {
        return BTreeMap::new();
    };

    mapping
        .iter()
        .filter_map(|(k, v)| Some((k.as_str()?.to_string(), v.as_str()?.to_string())))
        .collect()
}

fn get_sequence<'a>(value: Option<&'a Value>) -> &'a [Value] {
    value
        .and_then(Value::as_sequence)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Name from a `LocalObjectReference`-like value; empty names count as absent.
fn get_ref_name(value: Option<&Value>, key: &str) -> Option<String> {
    value
        .and_then(|v| get_string(v, key))
        .filter(|name| !name.is_empty())
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

// ============================================================================
// Object parsers
// ============================================================================

/// The `kind` field of a raw object.
pub fn object_kind(value: &Value) -> Option<&str> {
    value.get("kind")?.as_str()
}

pub fn parse_metadata(value: &Value) -> ObjectMeta {
    let Some(metadata) = value.get("metadata") else {
        return ObjectMeta::default();
    };

    ObjectMeta {
        name: get_string(metadata, "name").unwrap_or_default(),
        namespace: get_string(metadata, "namespace"),
        creation_timestamp: get_string(metadata, "creationTimestamp")
            .as_deref()
            .and_then(parse_timestamp),
        labels: get_string_map(metadata, "labels"),
    }
}

/// Parse a Deployment, StatefulSet or DaemonSet.
pub fn parse_workload(value: &Value) -> WorkloadInfo {
    let status = value.get("status");
    WorkloadInfo {
        meta: parse_metadata(value),
        replicas: status.and_then(|s| get_i64(s, "replicas")),
        pod_spec: parse_pod_template(value),
    }
}

pub fn parse_service(value: &Value) -> ServiceInfo {
    let selector = value
        .get("spec")
        .map(|spec| get_string_map(spec, "selector"))
        .unwrap_or_default();

    ServiceInfo {
        meta: parse_metadata(value),
        selector,
        has_matching_pods: None,
    }
}

pub fn parse_cron_job(value: &Value) -> CronJobInfo {
    CronJobInfo {
        meta: parse_metadata(value),
    }
}

pub fn parse_job(value: &Value) -> JobInfo {
    let status = value.get("status");
    JobInfo {
        meta: parse_metadata(value),
        succeeded: status.and_then(|s| get_i64(s, "succeeded")),
        failed: status.and_then(|s| get_i64(s, "failed")),
    }
}

pub fn parse_pvc(value: &Value) -> PvcInfo {
    PvcInfo {
        meta: parse_metadata(value),
        phase: value.get("status").and_then(|s| get_string(s, "phase")),
    }
}

pub fn parse_secret(value: &Value) -> SecretInfo {
    SecretInfo {
        meta: parse_metadata(value),
        secret_type: get_string(value, "type"),
    }
}

pub fn parse_config_map(value: &Value) -> ConfigMapInfo {
    ConfigMapInfo {
        meta: parse_metadata(value),
    }
}

// ============================================================================
// Pod template
// ============================================================================

fn parse_pod_template(value: &Value) -> Option<PodSpec> {
    let spec = value.get("spec")?.get("template")?.get("spec")?;
    Some(parse_pod_spec(spec))
}

/// Parse the parts of a pod spec that can reference Secrets or ConfigMaps.
pub fn parse_pod_spec(spec: &Value) -> PodSpec {
    PodSpec {
        containers: parse_containers(spec.get("containers")),
        init_containers: parse_containers(spec.get("initContainers")),
        volumes: parse_volumes(spec.get("volumes")),
    }
}

fn parse_containers(containers: Option<&Value>) -> Vec<Container> {
    get_sequence(containers)
        .iter()
        .map(|c| Container {
            name: get_string(c, "name").unwrap_or_default(),
            env_from: parse_env_from(c.get("envFrom")),
            env: parse_env_vars(c.get("env")),
        })
        .collect()
}

fn parse_env_from(env_from: Option<&Value>) -> Vec<EnvFromSource> {
    get_sequence(env_from)
        .iter()
        .map(|e| EnvFromSource {
            secret_ref: get_ref_name(e.get("secretRef"), "name"),
            config_map_ref: get_ref_name(e.get("configMapRef"), "name"),
        })
        .collect()
}

fn parse_env_vars(env: Option<&Value>) -> Vec<EnvVar> {
    get_sequence(env)
        .iter()
        .map(|e| EnvVar {
            name: get_string(e, "name").unwrap_or_default(),
            value_from: parse_env_var_source(e.get("valueFrom")),
        })
        .collect()
}

fn parse_env_var_source(vf: Option<&Value>) -> Option<EnvVarSource> {
    let vf = vf?;
    if let Some(secret) = vf.get("secretKeyRef") {
        return Some(EnvVarSource::SecretKeyRef {
            name: get_string(secret, "name").unwrap_or_default(),
            key: get_string(secret, "key").unwrap_or_default(),
        });
    }
    if let Some(cm) = vf.get("configMapKeyRef") {
        return Some(EnvVarSource::ConfigMapKeyRef {
            name: get_string(cm, "name").unwrap_or_default(),
            key: get_string(cm, "key").unwrap_or_default(),
        });
    }
    None
}

fn parse_volumes(volumes: Option<&Value>) -> Vec<Volume> {
    get_sequence(volumes)
        .iter()
        .map(|v| Volume {
            name: get_string(v, "name").unwrap_or_default(),
            secret: v.get("secret").and_then(|s| get_string(s, "secretName")),
            config_map: v.get("configMap").and_then(|c| get_string(c, "name")),
        })
        .collect()
}
