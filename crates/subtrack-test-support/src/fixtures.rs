//! Canned values shared across test suites.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use subtrack_core::frequency::Frequency;
use subtrack_core::subscription::Subscription;

/// Fixed timestamp used across all tests.
///
/// # Panics
///
/// Never; the date literal is valid.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

/// An active subscription stamped with [`fixed_now`].
#[must_use]
pub fn sample_subscription(id: i64, name: &str, amount: Decimal, frequency: Frequency) -> Subscription {
    Subscription {
        id,
        name: name.to_owned(),
        description: None,
        amount,
        frequency,
        start_date: fixed_now(),
        next_billing_date: None,
        active: true,
        created_at: fixed_now(),
    }
}
