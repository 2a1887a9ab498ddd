//! Display helpers.

use rust_decimal::{Decimal, RoundingStrategy};

/// Renders an amount as dollars and cents, e.g. `$15.99`. Fractions of a
/// cent are truncated.
#[must_use]
pub fn format_currency(amount: Decimal) -> String {
    let cents = amount.round_dp_with_strategy(2, RoundingStrategy::ToZero);
    if cents.is_sign_negative() && !cents.is_zero() {
        format!("-${:.2}", cents.abs())
    } else {
        format!("${:.2}", cents.abs())
    }
}
