//! Report-only comparison of the creation store and the replica.

use std::collections::BTreeMap;

use serde::Serialize;
use subtrack_core::error::DomainError;
use subtrack_core::repository::SubscriptionRepository;
use subtrack_core::subscription::Subscription;
use tracing::{info, warn};

/// A row present in both stores whose fields disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMismatch {
    /// Shared id.
    pub subscription_id: i64,
    /// Names of the differing fields, in declaration order.
    pub fields: Vec<&'static str>,
}

/// How far the replica has drifted from the creation store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    /// Rows compared across both stores.
    pub source_rows: usize,
    /// Rows in the replica.
    pub replica_rows: usize,
    /// Ids created but never synced.
    pub missing_in_replica: Vec<i64>,
    /// Ids the creation store no longer has.
    pub only_in_replica: Vec<i64>,
    /// Ids present in both with differing fields.
    pub mismatched: Vec<FieldMismatch>,
}

impl ReconciliationReport {
    /// Whether the stores hold the same rows with the same fields.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.missing_in_replica.is_empty()
            && self.only_in_replica.is_empty()
            && self.mismatched.is_empty()
    }
}

fn differing_fields(source: &Subscription, replica: &Subscription) -> Vec<&'static str> {
    let checks = [
        ("name", source.name == replica.name),
        ("description", source.description == replica.description),
        ("amount", source.amount == replica.amount),
        ("frequency", source.frequency == replica.frequency),
        ("startDate", source.start_date == replica.start_date),
        ("nextBillingDate", source.next_billing_date == replica.next_billing_date),
        ("active", source.active == replica.active),
        ("createdAt", source.created_at == replica.created_at),
    ];
    checks
        .into_iter()
        .filter_map(|(field, same)| (!same).then_some(field))
        .collect()
}

/// Compares every row of `source` with `replica` by id.
///
/// Nothing is written to either store.
///
/// # Errors
///
/// Returns `DomainError::Unavailable` if either store cannot be read.
pub async fn reconcile(
    source: &dyn SubscriptionRepository,
    replica: &dyn SubscriptionRepository,
) -> Result<ReconciliationReport, DomainError> {
    let source_rows = source.find_all().await?;
    let mut replica_by_id: BTreeMap<i64, Subscription> = replica
        .find_all()
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    let mut report = ReconciliationReport {
        source_rows: source_rows.len(),
        replica_rows: replica_by_id.len(),
        ..ReconciliationReport::default()
    };

    for row in &source_rows {
        match replica_by_id.remove(&row.id) {
            None => report.missing_in_replica.push(row.id),
            Some(copy) => {
                let fields = differing_fields(row, &copy);
                if !fields.is_empty() {
                    report.mismatched.push(FieldMismatch {
                        subscription_id: row.id,
                        fields,
                    });
                }
            }
        }
    }
    report.only_in_replica = replica_by_id.into_keys().collect();
    report.missing_in_replica.sort_unstable();

    if report.is_consistent() {
        info!(rows = report.source_rows, "stores are consistent");
    } else {
        warn!(
            missing_in_replica = report.missing_in_replica.len(),
            only_in_replica = report.only_in_replica.len(),
            mismatched = report.mismatched.len(),
            "stores have diverged"
        );
    }
    Ok(report)
}
