//! Boundary validation shared by create and update.

use rust_decimal::Decimal;

use crate::error::DomainError;
use crate::frequency::Frequency;
use crate::subscription::round_money;

/// Raw, unchecked subscription fields as they arrive from a caller.
#[derive(Debug, Clone, Default)]
pub struct UncheckedFields<'a> {
    /// Requested label.
    pub name: Option<&'a str>,
    /// Requested price.
    pub amount: Option<Decimal>,
    /// Requested cadence, as text.
    pub frequency: Option<&'a str>,
}

/// Fields that satisfy every boundary invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidFields {
    /// Non-blank label.
    pub name: String,
    /// Positive amount, normalized to cents.
    pub amount: Decimal,
    /// Parsed cadence.
    pub frequency: Frequency,
}

/// Checks name, amount, and frequency.
///
/// # Errors
///
/// Returns `DomainError::Validation` when the name is missing or blank, the
/// amount is missing or not positive after rounding to cents, or the
/// frequency is missing or not one of `MONTHLY`/`YEARLY`.
pub fn validate(fields: &UncheckedFields<'_>) -> Result<ValidFields, DomainError> {
    let name = match fields.name {
        Some(name) if !name.trim().is_empty() => name.to_owned(),
        _ => return Err(DomainError::Validation("name must not be blank".into())),
    };

    let amount = fields
        .amount
        .map(round_money)
        .ok_or_else(|| DomainError::Validation("amount is required".into()))?;
    if amount <= Decimal::ZERO {
        return Err(DomainError::Validation(format!(
            "amount must be greater than zero, got {amount}"
        )));
    }

    let frequency = fields
        .frequency
        .ok_or_else(|| DomainError::Validation("frequency is required".into()))?
        .parse::<Frequency>()?;

    Ok(ValidFields {
        name,
        amount,
        frequency,
    })
}
