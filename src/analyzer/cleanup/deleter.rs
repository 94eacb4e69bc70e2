//! Best-effort deletion of reported resources.

use crate::analyzer::cleanup::source::ResourceDeleter;
use crate::analyzer::cleanup::types::{DeletionOutcome, Report};

/// Delete every resource in `report`, in report order.
///
/// One failure never stops the remaining deletions; each attempt gets its
/// own outcome.
pub async fn purge<D: ResourceDeleter>(deleter: &D, report: &Report) -> Vec<DeletionOutcome> {
    let mut outcomes = Vec::with_capacity(report.len());

    for resource in report.iter() {
        let error = match deleter.delete(resource).await {
            Ok(()) => {
                log::info!("deleted {}", resource);
                None
            }
            Err(e) => {
                log::warn!("failed to delete {}: {}", resource, e);
                Some(e.to_string())
            }
        };

        outcomes.push(DeletionOutcome {
            resource: resource.clone(),
            error,
        });
    }

    outcomes
}

/// Number of failed attempts.
pub fn failure_count(outcomes: &[DeletionOutcome]) -> usize {
    outcomes.iter().filter(|o| !o.is_ok()).count()
}
