//! The creation event carried by the event channel.
//!
//! `SubscriptionCreatedEvent` is the wire contract between the creation
//! service and the sync listener. It is serialized as JSON with camelCase
//! field names; consumers ignore fields they do not know, so additive
//! changes are safe. Any field added to [`Subscription`] must be mirrored
//! here or it will not reach the replica.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::frequency::Frequency;
use crate::subscription::Subscription;

/// Topic every creation event is published to.
pub const SUBSCRIPTION_CREATED_TOPIC: &str = "subscription-created";

/// Consumer group the sync listener joins.
pub const SUBSCRIPTION_SYNC_GROUP: &str = "subscription-manager-group";

/// Type name used in logs and headers.
pub const SUBSCRIPTION_CREATED_EVENT_TYPE: &str = "subscription.created";

/// Immutable snapshot of a subscription at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionCreatedEvent {
    /// Id assigned by the creation store.
    pub subscription_id: i64,
    /// Label.
    pub name: String,
    /// Optional free text.
    pub description: Option<String>,
    /// Price per billing period.
    pub amount: Decimal,
    /// Billing cadence.
    pub frequency: Frequency,
    /// When billing started.
    pub start_date: DateTime<Utc>,
    /// Active flag at creation.
    pub active: bool,
    /// When the source row was persisted.
    pub created_at: DateTime<Utc>,
    /// When this event was produced.
    pub event_timestamp: DateTime<Utc>,
}

impl SubscriptionCreatedEvent {
    /// Snapshots a persisted subscription.
    #[must_use]
    pub fn from_subscription(subscription: &Subscription, event_timestamp: DateTime<Utc>) -> Self {
        Self {
            subscription_id: subscription.id,
            name: subscription.name.clone(),
            description: subscription.description.clone(),
            amount: subscription.amount,
            frequency: subscription.frequency,
            start_date: subscription.start_date,
            active: subscription.active,
            created_at: subscription.created_at,
            event_timestamp,
        }
    }

    /// Partition key: the stringified subscription id, so every event for a
    /// subscription lands on the same partition.
    #[must_use]
    pub fn partition_key(&self) -> String {
        self.subscription_id.to_string()
    }

    /// The replica row this event describes, keyed by the source id.
    #[must_use]
    pub fn to_subscription(&self) -> Subscription {
        Subscription {
            id: self.subscription_id,
            name: self.name.clone(),
            description: self.description.clone(),
            amount: self.amount,
            frequency: self.frequency,
            start_date: self.start_date,
            next_billing_date: None,
            active: self.active,
            created_at: self.created_at,
        }
    }

    /// Encodes the event as a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Serialization` if encoding fails.
    pub fn to_payload(&self) -> Result<Vec<u8>, DomainError> {
        serde_json::to_vec(self).map_err(|e| DomainError::Serialization(e.to_string()))
    }

    /// Decodes an event from a JSON payload, ignoring unknown fields.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Serialization` if the payload is not a valid event.
    pub fn from_payload(payload: &[u8]) -> Result<Self, DomainError> {
        serde_json::from_slice(payload).map_err(|e| DomainError::Serialization(e.to_string()))
    }
}
