//! Subscription tracker: Read/Query Service application layer.
//!
//! Serves reads, searches, filters, and totals from the replica store, and
//! applies update, toggle, and delete to that store only. None of those
//! mutations travel back to the creation-owned store.

pub mod application;
pub mod domain;
