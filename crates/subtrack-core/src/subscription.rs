//! The subscription entity and its REST view.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::frequency::Frequency;

const MONTHS_PER_YEAR: i64 = 12;

/// Rounds a money value to cents, half-up.
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// A tracked subscription as stored by either service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    /// Identifier assigned by the creation store; reused verbatim by the replica.
    pub id: i64,
    /// Non-empty label.
    pub name: String,
    /// Optional free text.
    pub description: Option<String>,
    /// Positive price per billing period.
    pub amount: Decimal,
    /// Billing cadence.
    pub frequency: Frequency,
    /// When billing started.
    pub start_date: DateTime<Utc>,
    /// Never computed by any component; carried as given.
    pub next_billing_date: Option<DateTime<Utc>>,
    /// Whether the subscription counts toward totals.
    pub active: bool,
    /// Set when the row was first persisted.
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// The cost normalized to one month.
    #[must_use]
    pub fn monthly_amount(&self) -> Decimal {
        match self.frequency {
            Frequency::Monthly => self.amount,
            Frequency::Yearly => round_money(self.amount / Decimal::from(MONTHS_PER_YEAR)),
        }
    }

    /// The cost normalized to one year.
    #[must_use]
    pub fn yearly_amount(&self) -> Decimal {
        match self.frequency {
            Frequency::Monthly => self.amount * Decimal::from(MONTHS_PER_YEAR),
            Frequency::Yearly => self.amount,
        }
    }
}

/// A subscription that has passed validation but has no id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    /// Non-empty label.
    pub name: String,
    /// Optional free text.
    pub description: Option<String>,
    /// Positive price per billing period.
    pub amount: Decimal,
    /// Billing cadence.
    pub frequency: Frequency,
    /// When billing started.
    pub start_date: DateTime<Utc>,
    /// Initial active flag.
    pub active: bool,
    /// Persistence timestamp.
    pub created_at: DateTime<Utc>,
}

impl NewSubscription {
    /// Attaches the id assigned by the store.
    #[must_use]
    pub fn with_id(self, id: i64) -> Subscription {
        Subscription {
            id,
            name: self.name,
            description: self.description,
            amount: self.amount,
            frequency: self.frequency,
            start_date: self.start_date,
            next_billing_date: None,
            active: self.active,
            created_at: self.created_at,
        }
    }
}

/// JSON representation of a subscription, including derived amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionView {
    /// Subscription identifier.
    pub id: i64,
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
    /// Next billing date, if known.
    pub next_billing_date: Option<DateTime<Utc>>,
    /// Whether the subscription counts toward totals.
    pub active: bool,
    /// Persistence timestamp.
    pub created_at: DateTime<Utc>,
    /// Cost normalized to one month.
    pub monthly_amount: Decimal,
    /// Cost normalized to one year.
    pub yearly_amount: Decimal,
}

impl From<&Subscription> for SubscriptionView {
    fn from(subscription: &Subscription) -> Self {
        Self {
            id: subscription.id,
            name: subscription.name.clone(),
            description: subscription.description.clone(),
            amount: subscription.amount,
            frequency: subscription.frequency,
            start_date: subscription.start_date,
            next_billing_date: subscription.next_billing_date,
            active: subscription.active,
            created_at: subscription.created_at,
            monthly_amount: subscription.monthly_amount(),
            yearly_amount: subscription.yearly_amount(),
        }
    }
}

impl From<Subscription> for SubscriptionView {
    fn from(subscription: Subscription) -> Self {
        Self::from(&subscription)
    }
}
