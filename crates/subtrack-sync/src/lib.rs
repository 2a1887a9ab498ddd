//! Subscription tracker: replica synchronization.
//!
//! [`SyncListener`] applies creation events to the replica store by upsert,
//! keyed by the source id. [`reconcile`] compares the two stores and reports
//! how they differ without repairing anything.

mod listener;
mod reconciliation;

pub use listener::SyncListener;
pub use reconciliation::{FieldMismatch, ReconciliationReport, reconcile};
