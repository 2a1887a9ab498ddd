//! Commands for the Creation Service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use subtrack_core::command::Command;
use uuid::Uuid;

/// Command to create a subscription.
///
/// Fields arrive unchecked; the handler validates them before anything is
/// persisted.
#[derive(Debug, Clone)]
pub struct CreateSubscription {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Requested label.
    pub name: Option<String>,
    /// Optional free text.
    pub description: Option<String>,
    /// Requested price per billing period.
    pub amount: Option<Decimal>,
    /// Requested cadence, as text.
    pub frequency: Option<String>,
    /// Initial active flag.
    pub active: bool,
    /// Billing start; the clock's now when absent.
    pub start_date: Option<DateTime<Utc>>,
}

impl Command for CreateSubscription {
    fn command_type(&self) -> &'static str {
        "subscription.create"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
