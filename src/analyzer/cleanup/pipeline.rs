//! Analysis stages: collect, index, classify.
//!
//! `collect` is the only async stage. Everything after it works on the
//! finished `Inventory`, so the reference index always sees every workload
//! the source could list before any Secret or ConfigMap is judged.

use crate::analyzer::cleanup::classifier::Classifier;
use crate::analyzer::cleanup::object::*;
use crate::analyzer::cleanup::parser;
use crate::analyzer::cleanup::references::ReferenceIndex;
use crate::analyzer::cleanup::rules::RuleSet;
use crate::analyzer::cleanup::source::{ResourceSource, label_selector};
use crate::analyzer::cleanup::types::{ListingFailure, Report, ResourceKind};
use chrono::{DateTime, Utc};
use serde_yaml::Value;

/// List every kind from `source`, then resolve Service selectors.
///
/// Listing failures are recorded per kind and never abort the scan. Pod
/// lookups only run when `rules` restricts Services to orphans, since no
/// other rule reads their result.
pub async fn collect<S: ResourceSource>(source: &S, rules: &RuleSet) -> Inventory {
    use ResourceKind::*;

    let mut inventory = Inventory::empty(source.namespace());

    inventory.deployments = list_parsed(source, Deployment, parser::parse_workload).await;
    inventory.stateful_sets = list_parsed(source, StatefulSet, parser::parse_workload).await;
    inventory.daemon_sets = list_parsed(source, DaemonSet, parser::parse_workload).await;
    inventory.services = list_parsed(source, Service, parser::parse_service).await;
    inventory.cron_jobs = list_parsed(source, CronJob, parser::parse_cron_job).await;
    inventory.jobs = list_parsed(source, Job, parser::parse_job).await;
    inventory.pvcs = list_parsed(source, Pvc, parser::parse_pvc).await;
    inventory.secrets = list_parsed(source, Secret, parser::parse_secret).await;
    inventory.config_maps = list_parsed(source, ConfigMap, parser::parse_config_map).await;

    if !rules.services_orphaned_only() {
        log::debug!("orphaned Service filter off; skipping pod lookups");
        return inventory;
    }

    if let Ok(services) = &mut inventory.services {
        for service in services.iter_mut().filter(|s| s.has_selector()) {
            match source.has_matching_pods(&service.selector).await {
                Ok(matched) => service.has_matching_pods = Some(matched),
                Err(e) => {
                    log::warn!(
                        "pod lookup for Service {} ({}) failed: {}",
                        service.meta.name,
                        label_selector(&service.selector),
                        e
                    );
                    inventory.selector_failures.push(ListingFailure::new(
                        ResourceKind::Service,
                        format!("pod lookup for {} failed: {}", service.meta.name, e),
                    ));
                }
            }
        }
    }

    inventory
}

async fn list_parsed<S, T>(
    source: &S,
    kind: ResourceKind,
    parse: fn(&Value) -> T,
) -> Listing<T>
where
    S: ResourceSource,
{
    match source.list(kind).await {
        Ok(values) => {
            log::debug!("{}: {} object(s)", kind, values.len());
            Ok(values.iter().map(parse).collect())
        }
        Err(e) => {
            log::warn!("failed to list {}s in {}: {}", kind, source.namespace(), e);
            failed(kind, e.to_string())
        }
    }
}

/// Classify a collected inventory into a report.
pub fn classify(inventory: &Inventory, rules: &RuleSet, now: DateTime<Utc>) -> Report {
    let references = ReferenceIndex::build(inventory.workload_pod_specs());
    if inventory.has_partial_references() {
        log::warn!(
            "workload listing incomplete; Secret and ConfigMap references may be missing"
        );
    }

    let classifier = Classifier::new(rules, now);
    let mut report = Report::new(inventory.namespace.clone());

    for kind in ResourceKind::ALL {
        let flagged: Vec<&str> = match kind {
            ResourceKind::Deployment => {
                select(&inventory.deployments, |d| classifier.deployment(d))
            }
            ResourceKind::StatefulSet => {
                select(&inventory.stateful_sets, |s| classifier.stateful_set(s))
            }
            ResourceKind::DaemonSet => {
                select(&inventory.daemon_sets, |d| classifier.daemon_set(d))
            }
            ResourceKind::Service => select(&inventory.services, |s| classifier.service(s)),
            ResourceKind::CronJob => select(&inventory.cron_jobs, |c| classifier.cron_job(c)),
            ResourceKind::Job => select(&inventory.jobs, |j| classifier.job(j)),
            ResourceKind::Pvc => select(&inventory.pvcs, |p| classifier.pvc(p)),
            ResourceKind::Secret => {
                select(&inventory.secrets, |s| classifier.secret(s, &references))
            }
            ResourceKind::ConfigMap => {
                select(&inventory.config_maps, |c| classifier.config_map(c, &references))
            }
        };

        for name in flagged {
            log::debug!("flagged {}/{}", kind, name);
            report.push(kind, name);
        }
    }

    report.warnings = inventory.failures();
    log::info!(
        "{} resource(s) flagged in {}, {} warning(s)",
        report.len(),
        report.namespace,
        report.warnings.len()
    );
    report
}

/// Names of listed items accepted by `predicate`, in listing order.
fn select<'a, T: HasMeta>(
    listing: &'a Listing<T>,
    predicate: impl Fn(&T) -> bool,
) -> Vec<&'a str> {
    items(listing)
        .iter()
        .filter(|item| predicate(*item))
        .map(|item| item.meta().name.as_str())
        .collect()
}

/// Collect from `source` and classify in one go.
pub async fn analyze_namespace<S: ResourceSource>(
    source: &S,
    rules: &RuleSet,
    now: DateTime<Utc>,
) -> Report {
    log::info!("analyzing namespace {}", source.namespace());
    let inventory = collect(source, rules).await;
    classify(&inventory, rules, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::cleanup::source::{ManifestSource, SourceError};
    use chrono::TimeZone;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const NAMESPACE: &str = r#"
kind: Deployment
metadata:
  name: api
  creationTimestamp: "2024-01-01T00:00:00Z"
status:
  replicas: 2
spec:
  template:
    spec:
      containers:
        - name: api
          envFrom:
            - secretRef:
                name: api-env
---
kind: Deployment
metadata:
  name: idle
  creationTimestamp: "2024-05-30T00:00:00Z"
status: {}
---
kind: Service
metadata:
  name: api
  creationTimestamp: "2024-01-01T00:00:00Z"
spec:
  selector:
    app: api
---
kind: Service
metadata:
  name: legacy
  creationTimestamp: "2024-01-01T00:00:00Z"
spec:
  selector:
    app: legacy
---
kind: Pod
metadata:
  name: api-1
  labels:
    app: api
---
kind: Job
metadata:
  name: backfill
  creationTimestamp: "2024-05-31T00:00:00Z"
status:
  succeeded: 1
---
kind: Secret
metadata:
  name: api-env
  creationTimestamp: "2024-01-01T00:00:00Z"
type: Opaque
---
kind: Secret
metadata:
  name: stale
  creationTimestamp: "2024-01-01T00:00:00Z"
type: Opaque
"#;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn broken() -> SourceError {
        SourceError::ManifestParse {
            origin: "flaky".to_string(),
            source: serde_yaml::from_str::<Value>("[").unwrap_err(),
        }
    }

    /// Source whose pod lookups always fail, optionally along with the
    /// Deployment listing.
    struct FlakySource {
        inner: ManifestSource,
        fail_deployments: bool,
        pod_lookups: AtomicUsize,
    }

    impl FlakySource {
        fn new(fail_deployments: bool) -> Self {
            Self {
                inner: ManifestSource::parse(NAMESPACE, "default").unwrap(),
                fail_deployments,
                pod_lookups: AtomicUsize::new(0),
            }
        }
    }

    impl ResourceSource for FlakySource {
        fn namespace(&self) -> &str {
            self.inner.namespace()
        }

        async fn list(&self, kind: ResourceKind) -> Result<Vec<Value>, SourceError> {
            if self.fail_deployments && kind == ResourceKind::Deployment {
                return Err(broken());
            }
            self.inner.list(kind).await
        }

        async fn has_matching_pods(
            &self,
            _selector: &BTreeMap<String, String>,
        ) -> Result<bool, SourceError> {
            self.pod_lookups.fetch_add(1, Ordering::SeqCst);
            Err(broken())
        }
    }

    #[tokio::test]
    async fn test_empty_rules_flag_jobs_and_unfiltered_kinds() {
        let source = ManifestSource::parse(NAMESPACE, "default").unwrap();
        let report = analyze_namespace(&source, &RuleSet::new(), now()).await;

        assert!(report.names_of(ResourceKind::Deployment).is_empty());
        assert_eq!(report.names_of(ResourceKind::Job), vec!["backfill"]);
        // Services and Secrets are only narrowed by filters, none of which is active.
        assert_eq!(report.names_of(ResourceKind::Service), vec!["api", "legacy"]);
        assert_eq!(report.names_of(ResourceKind::Secret), vec!["api-env", "stale"]);
        assert!(report.is_complete());
    }

    #[tokio::test]
    async fn test_report_follows_scan_order() {
        let source = ManifestSource::parse(NAMESPACE, "default").unwrap();
        let rules = RuleSet::new()
            .with_deployment_replicas(0)
            .with_orphaned_services_only(true)
            .with_orphaned_secrets_only(true);
        let report = analyze_namespace(&source, &rules, now()).await;

        let entries: Vec<String> = report.iter().map(ToString::to_string).collect();
        assert_eq!(
            entries,
            vec!["Deployment/idle", "Service/legacy", "Job/backfill", "Secret/stale"]
        );
    }

    #[tokio::test]
    async fn test_failures_become_warnings() {
        let source = FlakySource::new(true);
        let rules = RuleSet::new().with_orphaned_services_only(true);
        let inventory = collect(&source, &rules).await;

        assert!(inventory.deployments.is_err());
        assert_eq!(inventory.selector_failures.len(), 2);

        let report = classify(&inventory, &rules, now());
        assert!(!report.is_complete());
        assert_eq!(report.warnings.len(), 3);
        assert_eq!(report.warnings[0].kind, ResourceKind::Deployment);
        // Unknown pod match never counts as orphaned.
        assert!(report.names_of(ResourceKind::Service).is_empty());
    }

    #[tokio::test]
    async fn test_pod_lookups_skipped_without_service_orphan_filter() {
        for rules in [
            RuleSet::new().with_older_than_days(30),
            RuleSet::new().with_orphaned_services_only(false),
        ] {
            let source = FlakySource::new(false);
            let report = analyze_namespace(&source, &rules, now()).await;

            assert_eq!(source.pod_lookups.load(Ordering::SeqCst), 0);
            assert!(report.is_complete());
            assert_eq!(report.names_of(ResourceKind::Service), vec!["api", "legacy"]);
        }
    }

    #[tokio::test]
    async fn test_pod_lookups_run_with_service_orphan_filter() {
        let source = FlakySource::new(false);
        let rules = RuleSet::new().with_orphaned_services_only(true);
        let report = analyze_namespace(&source, &rules, now()).await;

        assert_eq!(source.pod_lookups.load(Ordering::SeqCst), 2);
        assert_eq!(report.warnings.len(), 2);
        assert!(report.warnings.iter().all(|w| w.kind == ResourceKind::Service));
    }
}
