//! REST request bodies shared by the services and the client.
//!
//! Every field is optional on the wire so that a missing or malformed
//! value reaches validation and comes back as a validation error instead
//! of a deserialization failure.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::frequency::Frequency;

/// Body of `POST /api/subscriptions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    /// Label; must not be blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Optional free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Price per billing period; must be positive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    /// `MONTHLY` or `YEARLY`, any case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    /// Defaults to `true`.
    #[serde(default, alias = "active", skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// Defaults to the time of creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
}

impl CreateSubscriptionRequest {
    /// A request carrying the three required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, amount: Decimal, frequency: Frequency) -> Self {
        Self {
            name: Some(name.into()),
            amount: Some(amount),
            frequency: Some(frequency.as_str().to_owned()),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the initial active flag.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.is_active = Some(active);
        self
    }
}

/// Body of `PUT /api/subscriptions/{id}`: the full subscription as the
/// caller wants it stored. `id`, `createdAt`, and the derived amounts are
/// accepted and ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubscriptionRequest {
    /// New label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New free text; absent clears it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New price per billing period.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    /// New cadence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    /// New billing start; kept when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    /// Stored as given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_billing_date: Option<DateTime<Utc>>,
    /// New active flag; kept when absent.
    #[serde(default, alias = "isActive", skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl From<&crate::subscription::SubscriptionView> for UpdateSubscriptionRequest {
    fn from(view: &crate::subscription::SubscriptionView) -> Self {
        Self {
            name: Some(view.name.clone()),
            description: view.description.clone(),
            amount: Some(view.amount),
            frequency: Some(view.frequency.as_str().to_owned()),
            start_date: Some(view.start_date),
            next_billing_date: view.next_billing_date,
            active: Some(view.active),
        }
    }
}
