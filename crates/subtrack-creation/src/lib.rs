//! Subscription tracker: Creation Service application layer.
//!
//! Validates creation requests, persists them to the creation-owned store,
//! and hands a `SubscriptionCreatedEvent` to the event channel without
//! waiting for the broker.

pub mod application;
pub mod domain;
