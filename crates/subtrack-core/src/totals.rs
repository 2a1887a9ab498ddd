//! Aggregate spend across active subscriptions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::frequency::Frequency;
use crate::subscription::{Subscription, round_money};

/// Monthly and yearly spend across every active subscription.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionTotals {
    /// Sum of active amounts normalized to one month.
    pub monthly_total: Decimal,
    /// Sum of active amounts normalized to one year.
    pub yearly_total: Decimal,
}

impl SubscriptionTotals {
    /// Sums the active subscriptions in `subscriptions`; inactive rows are
    /// skipped. Per-row contributions are summed unrounded and the totals
    /// are rounded to cents, half-up, at the end.
    #[must_use]
    pub fn from_subscriptions<'a, I>(subscriptions: I) -> Self
    where
        I: IntoIterator<Item = &'a Subscription>,
    {
        let twelve = Decimal::from(12);
        let (monthly, yearly) = subscriptions
            .into_iter()
            .filter(|s| s.active)
            .fold((Decimal::ZERO, Decimal::ZERO), |(monthly, yearly), s| {
                match s.frequency {
                    Frequency::Monthly => (monthly + s.amount, yearly + s.amount * twelve),
                    Frequency::Yearly => (monthly + s.amount / twelve, yearly + s.amount),
                }
            });

        Self {
            monthly_total: round_money(monthly),
            yearly_total: round_money(yearly),
        }
    }
}
