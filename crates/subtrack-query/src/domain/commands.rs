//! Commands for the Read/Query Service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use subtrack_core::command::Command;
use uuid::Uuid;

/// Command to replace the editable fields of a replica row.
#[derive(Debug, Clone)]
pub struct UpdateSubscription {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Target row.
    pub subscription_id: i64,
    /// New label.
    pub name: Option<String>,
    /// New free text; `None` clears it.
    pub description: Option<String>,
    /// New price per billing period.
    pub amount: Option<Decimal>,
    /// New cadence, as text.
    pub frequency: Option<String>,
    /// New billing start; the stored value is kept when absent.
    pub start_date: Option<DateTime<Utc>>,
    /// Stored as given.
    pub next_billing_date: Option<DateTime<Utc>>,
    /// New active flag; the stored value is kept when absent.
    pub active: Option<bool>,
}

impl Command for UpdateSubscription {
    fn command_type(&self) -> &'static str {
        "subscription.update"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn subscription_id(&self) -> Option<i64> {
        Some(self.subscription_id)
    }
}

/// Command to flip a replica row's active flag.
#[derive(Debug, Clone)]
pub struct ToggleSubscriptionActive {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Target row.
    pub subscription_id: i64,
}

impl Command for ToggleSubscriptionActive {
    fn command_type(&self) -> &'static str {
        "subscription.toggle_active"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn subscription_id(&self) -> Option<i64> {
        Some(self.subscription_id)
    }
}

/// Command to remove a replica row.
#[derive(Debug, Clone)]
pub struct DeleteSubscription {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Target row.
    pub subscription_id: i64,
}

impl Command for DeleteSubscription {
    fn command_type(&self) -> &'static str {
        "subscription.delete"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn subscription_id(&self) -> Option<i64> {
        Some(self.subscription_id)
    }
}
