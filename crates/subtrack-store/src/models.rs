//! Row mapping between PostgreSQL and the domain entity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use subtrack_core::error::DomainError;
use subtrack_core::frequency::Frequency;
use subtrack_core::subscription::Subscription;

/// A row of the `subscriptions` table.
#[derive(Debug, Clone, FromRow)]
pub struct SubscriptionRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub frequency: String,
    pub start_date: DateTime<Utc>,
    pub next_billing_date: Option<DateTime<Utc>>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let frequency: Frequency = row.frequency.parse().map_err(|_| {
            DomainError::Serialization(format!(
                "row {} has unknown frequency '{}'",
                row.id, row.frequency
            ))
        })?;
        Ok(Subscription {
            id: row.id,
            name: row.name,
            description: row.description,
            amount: row.amount,
            frequency,
            start_date: row.start_date,
            next_billing_date: row.next_billing_date,
            active: row.active,
            created_at: row.created_at,
        })
    }
}

/// Converts a batch of rows, failing on the first unmappable one.
pub(crate) fn into_subscriptions(rows: Vec<SubscriptionRow>) -> Result<Vec<Subscription>, DomainError> {
    rows.into_iter().map(Subscription::try_from).collect()
}
