//! Per-kind removal predicates.
//!
//! Each check answers "should this object be reported?" for one observed
//! object. Checks never fail: an unknown age, phase, type or pod match makes
//! the corresponding condition unmet.
//!
//! | Kind | Reported when |
//! |------|---------------|
//! | Deployment | replicas <= replica threshold, or old enough |
//! | StatefulSet, DaemonSet, CronJob | old enough |
//! | Service | age allows and (orphan filter off or orphaned) |
//! | Job | not younger than the age floor and (completed filter off or finished) |
//! | PVC | phase listed, else old enough |
//! | Secret | type allowed, orphan filter satisfied, age allows |
//! | ConfigMap | orphan filter satisfied, age allows |

use crate::analyzer::cleanup::object::{
    ConfigMapInfo, CronJobInfo, JobInfo, PvcInfo, SecretInfo, ServiceInfo, WorkloadInfo,
};
use crate::analyzer::cleanup::references::ReferenceIndex;
use crate::analyzer::cleanup::rules::{RuleSet, contains_ignore_case};
use chrono::{DateTime, Utc};

/// Evaluates a rule set against observed objects at a fixed point in time.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    rules: &'a RuleSet,
    now: DateTime<Utc>,
}

impl<'a> Classifier<'a> {
    pub fn new(rules: &'a RuleSet, now: DateTime<Utc>) -> Self {
        Self { rules, now }
    }

    pub fn deployment(&self, deployment: &WorkloadInfo) -> bool {
        let replicas = deployment.replicas.unwrap_or(0);
        let few_replicas = self
            .rules
            .replica_threshold()
            .is_some_and(|threshold| replicas <= threshold);

        few_replicas || self.rules.is_old_enough(deployment.meta.age_days(self.now))
    }

    pub fn stateful_set(&self, stateful_set: &WorkloadInfo) -> bool {
        self.rules.is_old_enough(stateful_set.meta.age_days(self.now))
    }

    pub fn daemon_set(&self, daemon_set: &WorkloadInfo) -> bool {
        self.rules.is_old_enough(daemon_set.meta.age_days(self.now))
    }

    pub fn service(&self, service: &ServiceInfo) -> bool {
        let age_ok = self.rules.age_allows(service.meta.age_days(self.now));
        let orphan_ok = !self.rules.services_orphaned_only() || self.is_orphaned_service(service);
        age_ok && orphan_ok
    }

    /// A Service is orphaned when its selector matches no Pod.
    ///
    /// Selector-less Services count as orphaned unless the rule set says
    /// otherwise. An unknown match result is not an orphan.
    pub fn is_orphaned_service(&self, service: &ServiceInfo) -> bool {
        if !service.has_selector() {
            return self.rules.selectorless_services_are_orphans();
        }
        service.has_matching_pods == Some(false)
    }

    pub fn cron_job(&self, cron_job: &CronJobInfo) -> bool {
        self.rules.is_old_enough(cron_job.meta.age_days(self.now))
    }

    /// Jobs are reported by default; the age floor and the completed-only
    /// filter can only exclude them.
    pub fn job(&self, job: &JobInfo) -> bool {
        let age = job.meta.age_days(self.now);
        if self.rules.age_threshold().is_some() && !self.rules.is_old_enough(age) {
            return false;
        }
        if self.rules.jobs_completed_only() && !job.is_finished() {
            return false;
        }
        true
    }

    /// Phase filter takes precedence over the age rule.
    pub fn pvc(&self, pvc: &PvcInfo) -> bool {
        let phases = self.rules.pvc_phase_filter();
        if !phases.is_empty() {
            return pvc
                .phase
                .as_deref()
                .is_some_and(|phase| contains_ignore_case(phases, phase));
        }
        self.rules.is_old_enough(pvc.meta.age_days(self.now))
    }

    pub fn secret(&self, secret: &SecretInfo, references: &ReferenceIndex) -> bool {
        let types = self.rules.secret_type_filter();
        let type_allowed = types.is_empty()
            || secret
                .secret_type
                .as_deref()
                .is_some_and(|t| contains_ignore_case(types, t));

        let orphaned = !references.is_secret_referenced(&secret.meta.name);
        let orphan_ok = !self.rules.secrets_orphaned_only() || orphaned;
        let age_ok = self.rules.age_allows(secret.meta.age_days(self.now));

        type_allowed && orphan_ok && age_ok
    }

    pub fn config_map(&self, config_map: &ConfigMapInfo, references: &ReferenceIndex) -> bool {
        let orphaned = !references.is_config_map_referenced(&config_map.meta.name);
        let orphan_ok = !self.rules.configmaps_orphaned_only() || orphaned;
        let age_ok = self.rules.age_allows(config_map.meta.age_days(self.now));
        orphan_ok && age_ok
    }
}
