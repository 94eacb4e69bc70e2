use chrono::{DateTime, Duration, TimeZone, Utc};
use kubectl_cleaner::analyzer::cleanup::object::{ObjectMeta, WorkloadInfo};
use kubectl_cleaner::analyzer::cleanup::{
    Classifier, ManifestSource, Report, ResourceKind, RuleSet, analyze_namespace, collect,
};
use proptest::prelude::*;
use std::path::Path;

const FIXTURE: &str = "tests/fixtures/cleanup/shop.yaml";

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

fn shop() -> ManifestSource {
    ManifestSource::from_path(Path::new(FIXTURE), "shop").unwrap()
}

async fn analyze(rules: RuleSet) -> Report {
    analyze_namespace(&shop(), &rules, now()).await
}

#[tokio::test]
async fn empty_rules_flag_no_stale_kinds_but_every_job() {
    let report = analyze(RuleSet::new()).await;

    for kind in [
        ResourceKind::Deployment,
        ResourceKind::StatefulSet,
        ResourceKind::DaemonSet,
        ResourceKind::CronJob,
        ResourceKind::Pvc,
    ] {
        assert!(report.names_of(kind).is_empty(), "{} flagged without rules", kind);
    }
    assert_eq!(
        report.names_of(ResourceKind::Job),
        vec!["nightly-report-28620000", "reindex"]
    );
    assert!(report.is_complete());
}

#[tokio::test]
async fn other_namespaces_are_ignored() {
    let report = analyze(RuleSet::new()).await;
    assert!(!report.names_of(ResourceKind::Secret).contains(&"billing-key"));
    assert_eq!(report.namespace, "shop");
}

#[tokio::test]
async fn strict_rules_report_in_scan_order() {
    let rules = RuleSet::new()
        .with_older_than_days(30)
        .with_deployment_replicas(0)
        .with_job_completed_only(true)
        .with_pvc_phases(["pending"])
        .with_secret_types(["opaque"])
        .with_orphaned_services_only(true)
        .with_orphaned_secrets_only(true)
        .with_orphaned_configmaps_only(true);

    let report = analyze(rules).await;
    let entries: Vec<String> = report.iter().map(ToString::to_string).collect();

    assert_eq!(
        entries,
        vec![
            "Deployment/storefront",
            "Deployment/legacy-admin",
            "DaemonSet/log-agent",
            "Service/legacy-admin",
            "Service/external-db",
            "CronJob/nightly-report",
            "PVC/scratch",
            "Secret/old-deploy-token",
            "ConfigMap/feature-flags-v1",
        ]
    );
}

#[tokio::test]
async fn referenced_secrets_are_never_orphaned() {
    for orphaned_only in [false, true] {
        let report = analyze(RuleSet::new().with_orphaned_secrets_only(orphaned_only)).await;
        let secrets = report.names_of(ResourceKind::Secret);
        assert_eq!(secrets.contains(&"postgres-credentials"), !orphaned_only);
        assert_eq!(secrets.contains(&"payments-api-key"), !orphaned_only);
    }
}

#[tokio::test]
async fn init_container_and_volume_references_count() {
    let report = analyze(RuleSet::new().with_orphaned_configmaps_only(true)).await;
    assert_eq!(report.names_of(ResourceKind::ConfigMap), vec!["feature-flags-v1"]);
}

#[tokio::test]
async fn pvc_phase_filter_takes_precedence_over_age() {
    let rules = RuleSet::new()
        .with_pvc_phases(["Pending"])
        .with_older_than_days(9999);
    let report = analyze(rules).await;
    assert_eq!(report.names_of(ResourceKind::Pvc), vec!["scratch"]);

    let by_age = analyze(RuleSet::new().with_older_than_days(10)).await;
    assert_eq!(by_age.names_of(ResourceKind::Pvc), vec!["postgres-data"]);
}

#[tokio::test]
async fn selectorless_services_follow_policy() {
    let orphans = RuleSet::new().with_orphaned_services_only(true);
    let report = analyze(orphans.clone()).await;
    assert_eq!(
        report.names_of(ResourceKind::Service),
        vec!["legacy-admin", "external-db"]
    );

    let report = analyze(orphans.with_selectorless_services_orphaned(false)).await;
    assert_eq!(report.names_of(ResourceKind::Service), vec!["legacy-admin"]);
}

#[tokio::test]
async fn job_rules() {
    let completed = analyze(RuleSet::new().with_job_completed_only(true)).await;
    assert_eq!(
        completed.names_of(ResourceKind::Job),
        vec!["nightly-report-28620000"]
    );

    let explicit_off = analyze(RuleSet::new().with_job_completed_only(false)).await;
    assert_eq!(explicit_off.names_of(ResourceKind::Job).len(), 2);

    let aged = analyze(RuleSet::new().with_older_than_days(5)).await;
    assert!(aged.names_of(ResourceKind::Job).is_empty());
}

#[tokio::test]
async fn optional_boolean_rules_treat_unset_as_false() {
    let names = |report: &Report, kind: ResourceKind| -> Vec<String> {
        report.names_of(kind).into_iter().map(String::from).collect()
    };

    type Toggle = fn(RuleSet, bool) -> RuleSet;
    let toggles: [(ResourceKind, Toggle); 4] = [
        (ResourceKind::Job, RuleSet::with_job_completed_only),
        (ResourceKind::Service, RuleSet::with_orphaned_services_only),
        (ResourceKind::Secret, RuleSet::with_orphaned_secrets_only),
        (ResourceKind::ConfigMap, RuleSet::with_orphaned_configmaps_only),
    ];

    let unset = analyze(RuleSet::new()).await;
    for (kind, toggle) in toggles {
        let off = analyze(toggle(RuleSet::new(), false)).await;
        let on = analyze(toggle(RuleSet::new(), true)).await;

        assert_eq!(names(&off, kind), names(&unset, kind), "{kind}=false");
        assert_ne!(names(&on, kind), names(&unset, kind), "{kind}=true");
    }

    let services = analyze(RuleSet::new().with_orphaned_services_only(true)).await;
    assert_eq!(
        unset.names_of(ResourceKind::Service),
        vec!["storefront", "legacy-admin", "external-db"]
    );
    assert_eq!(
        services.names_of(ResourceKind::Service),
        vec!["legacy-admin", "external-db"]
    );

    let config_maps = analyze(RuleSet::new().with_orphaned_configmaps_only(false)).await;
    assert_eq!(
        config_maps.names_of(ResourceKind::ConfigMap),
        vec!["storefront-config", "postgres-init", "log-agent-config", "feature-flags-v1"]
    );
}

#[tokio::test]
async fn inventory_keeps_templates_for_reference_index() {
    let inventory = collect(&shop(), &RuleSet::new()).await;
    assert_eq!(inventory.workload_pod_specs().count(), 4);
    assert!(inventory.failures().is_empty());
}

fn stateful_set_created(created: DateTime<Utc>) -> WorkloadInfo {
    WorkloadInfo {
        meta: ObjectMeta::named("db").created_at(created),
        replicas: Some(1),
        pod_spec: None,
    }
}

proptest! {
    #[test]
    fn age_rule_is_inclusive_at_the_boundary(threshold in 1i64..3650, extra_secs in 0i64..86_400) {
        let rules = RuleSet::new().with_older_than_days(threshold);
        let classifier = Classifier::new(&rules, now());

        let exactly_old = now() - Duration::days(threshold) - Duration::seconds(extra_secs);
        prop_assert!(classifier.stateful_set(&stateful_set_created(exactly_old)));

        let one_day_younger = now() - Duration::days(threshold - 1) - Duration::seconds(extra_secs);
        prop_assert!(!classifier.stateful_set(&stateful_set_created(one_day_younger)));
    }
}
