//! Rule set for cleanup analysis.
//!
//! Every field is optional. `None` means the heuristic does not apply, which
//! is different from an explicit `false` or `0`: an explicit value still
//! overrides a lower layer when rule sets are merged. Negative numeric
//! thresholds disable their heuristic.

use serde::{Deserialize, Serialize};

/// Heuristics and thresholds for one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleSet {
    /// Deployment is stale if its replica count is <= this value
    #[serde(alias = "deployment_replica_threshold", skip_serializing_if = "Option::is_none")]
    pub deployment_replicas: Option<i64>,

    /// Only finished Jobs (succeeded or failed > 0) are eligible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_completed_only: Option<bool>,

    /// PVC phases considered unused (case-insensitive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pvc_phases: Option<Vec<String>>,

    /// Secret types eligible for removal (case-insensitive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_types: Option<Vec<String>>,

    /// Only Services with no matching Pods are eligible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orphaned_services_only: Option<bool>,

    /// Only Secrets no workload references are eligible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orphaned_secrets_only: Option<bool>,

    /// Only ConfigMaps no workload references are eligible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orphaned_configmaps_only: Option<bool>,

    /// Whether a Service without a selector counts as orphaned (unset = yes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selectorless_services_orphaned: Option<bool>,

    /// Minimum age in whole days
    #[serde(
        rename = "older_than",
        alias = "older_than_days",
        skip_serializing_if = "Option::is_none"
    )]
    pub older_than_days: Option<i64>,
}

impl RuleSet {
    /// Create an empty rule set (no heuristic active).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Deployment replica threshold.
    pub fn with_deployment_replicas(mut self, threshold: i64) -> Self {
        self.deployment_replicas = Some(threshold);
        self
    }

    /// Set the completed-only filter for Jobs.
    pub fn with_job_completed_only(mut self, enabled: bool) -> Self {
        self.job_completed_only = Some(enabled);
        self
    }

    /// Set the PVC phases considered unused.
    pub fn with_pvc_phases<I, S>(mut self, phases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pvc_phases = Some(phases.into_iter().map(Into::into).collect());
        self
    }

    /// Restrict Secrets to the given types.
    pub fn with_secret_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.secret_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_orphaned_services_only(mut self, enabled: bool) -> Self {
        self.orphaned_services_only = Some(enabled);
        self
    }

    pub fn with_orphaned_secrets_only(mut self, enabled: bool) -> Self {
        self.orphaned_secrets_only = Some(enabled);
        self
    }

    pub fn with_orphaned_configmaps_only(mut self, enabled: bool) -> Self {
        self.orphaned_configmaps_only = Some(enabled);
        self
    }

    pub fn with_selectorless_services_orphaned(mut self, enabled: bool) -> Self {
        self.selectorless_services_orphaned = Some(enabled);
        self
    }

    /// Set the minimum age in days.
    pub fn with_older_than_days(mut self, days: i64) -> Self {
        self.older_than_days = Some(days);
        self
    }

    /// Overlay `overrides` on top of `self`, field by field.
    ///
    /// Fields set in `overrides` replace ours; lists are replaced whole.
    pub fn merge(self, overrides: RuleSet) -> RuleSet {
        RuleSet {
            deployment_replicas: overrides.deployment_replicas.or(self.deployment_replicas),
            job_completed_only: overrides.job_completed_only.or(self.job_completed_only),
            pvc_phases: overrides.pvc_phases.or(self.pvc_phases),
            secret_types: overrides.secret_types.or(self.secret_types),
            orphaned_services_only: overrides
                .orphaned_services_only
                .or(self.orphaned_services_only),
            orphaned_secrets_only: overrides.orphaned_secrets_only.or(self.orphaned_secrets_only),
            orphaned_configmaps_only: overrides
                .orphaned_configmaps_only
                .or(self.orphaned_configmaps_only),
            selectorless_services_orphaned: overrides
                .selectorless_services_orphaned
                .or(self.selectorless_services_orphaned),
            older_than_days: overrides.older_than_days.or(self.older_than_days),
        }
    }

    /// The active age threshold, if the age rule is enabled.
    pub fn age_threshold(&self) -> Option<i64> {
        self.older_than_days.filter(|days| *days >= 0)
    }

    /// The active replica threshold, if the replica rule is enabled.
    pub fn replica_threshold(&self) -> Option<i64> {
        self.deployment_replicas.filter(|n| *n >= 0)
    }

    /// True when the age rule is enabled and `age_days` meets it.
    ///
    /// An unknown age never meets an enabled rule.
    pub fn is_old_enough(&self, age_days: Option<i64>) -> bool {
        match self.age_threshold() {
            Some(threshold) => age_days.is_some_and(|age| age >= threshold),
            None => false,
        }
    }

    /// True when the age rule is disabled or `age_days` meets it.
    pub fn age_allows(&self, age_days: Option<i64>) -> bool {
        self.age_threshold().is_none() || self.is_old_enough(age_days)
    }

    pub fn jobs_completed_only(&self) -> bool {
        self.job_completed_only.unwrap_or(false)
    }

    pub fn services_orphaned_only(&self) -> bool {
        self.orphaned_services_only.unwrap_or(false)
    }

    pub fn secrets_orphaned_only(&self) -> bool {
        self.orphaned_secrets_only.unwrap_or(false)
    }

    pub fn configmaps_orphaned_only(&self) -> bool {
        self.orphaned_configmaps_only.unwrap_or(false)
    }

    pub fn selectorless_services_are_orphans(&self) -> bool {
        self.selectorless_services_orphaned.unwrap_or(true)
    }

    /// Configured PVC phases; empty when unset.
    pub fn pvc_phase_filter(&self) -> &[String] {
        self.pvc_phases.as_deref().unwrap_or_default()
    }

    /// Configured Secret types; empty when unset.
    pub fn secret_type_filter(&self) -> &[String] {
        self.secret_types.as_deref().unwrap_or_default()
    }

    /// True when no heuristic is configured at all.
    pub fn is_empty(&self) -> bool {
        *self == RuleSet::default()
    }
}

/// Case-insensitive membership test.
pub fn contains_ignore_case(list: &[String], value: &str) -> bool {
    list.iter().any(|item| item.eq_ignore_ascii_case(value))
}

/// Split a comma-separated flag value, trimming items and dropping empty ones.
pub fn parse_comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
