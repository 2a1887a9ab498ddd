//! Command handlers for the Read/Query Service.
//!
//! These mutate the replica store directly. Nothing is published, so the
//! creation-owned store keeps the values it had at creation time.

use subtrack_core::command::Command;
use subtrack_core::error::DomainError;
use subtrack_core::repository::SubscriptionRepository;
use subtrack_core::subscription::Subscription;
use subtrack_core::validation::{UncheckedFields, validate};
use tracing::info;

use crate::domain::commands::{DeleteSubscription, ToggleSubscriptionActive, UpdateSubscription};

/// Handles the `UpdateSubscription` command: validates the new fields and
/// replaces the stored row, keeping its id and `created_at`.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the name, amount, or frequency is
/// invalid.
/// Returns `DomainError::SubscriptionNotFound` if no row has this id.
/// Returns `DomainError::Unavailable` if the store fails.
pub async fn handle_update_subscription(
    command: &UpdateSubscription,
    repo: &dyn SubscriptionRepository,
) -> Result<Subscription, DomainError> {
    let valid = validate(&UncheckedFields {
        name: command.name.as_deref(),
        amount: command.amount,
        frequency: command.frequency.as_deref(),
    })?;

    let existing = repo
        .find_by_id(command.subscription_id)
        .await?
        .ok_or(DomainError::SubscriptionNotFound(command.subscription_id))?;

    let updated = Subscription {
        id: existing.id,
        name: valid.name,
        description: command.description.clone(),
        amount: valid.amount,
        frequency: valid.frequency,
        start_date: command.start_date.unwrap_or(existing.start_date),
        next_billing_date: command.next_billing_date,
        active: command.active.unwrap_or(existing.active),
        created_at: existing.created_at,
    };
    repo.upsert(&updated).await?;

    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        subscription_id = updated.id,
        "subscription updated in replica only"
    );
    Ok(updated)
}

/// Handles the `ToggleSubscriptionActive` command with a single atomic flip
/// in the store.
///
/// # Errors
///
/// Returns `DomainError::SubscriptionNotFound` if no row has this id.
/// Returns `DomainError::Unavailable` if the store fails.
pub async fn handle_toggle_subscription_active(
    command: &ToggleSubscriptionActive,
    repo: &dyn SubscriptionRepository,
) -> Result<Subscription, DomainError> {
    let toggled = repo
        .toggle_active(command.subscription_id)
        .await?
        .ok_or(DomainError::SubscriptionNotFound(command.subscription_id))?;

    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        subscription_id = toggled.id,
        active = toggled.active,
        "subscription toggled in replica only"
    );
    Ok(toggled)
}

/// Handles the `DeleteSubscription` command.
///
/// # Errors
///
/// Returns `DomainError::SubscriptionNotFound` if no row has this id.
/// Returns `DomainError::Unavailable` if the store fails.
pub async fn handle_delete_subscription(
    command: &DeleteSubscription,
    repo: &dyn SubscriptionRepository,
) -> Result<(), DomainError> {
    if !repo.delete(command.subscription_id).await? {
        return Err(DomainError::SubscriptionNotFound(command.subscription_id));
    }

    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        subscription_id = command.subscription_id,
        "subscription deleted from replica only"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use subtrack_core::error::DomainError;
    use subtrack_core::frequency::Frequency;
    use subtrack_test_support::{InMemorySubscriptionRepository, fixed_now, sample_subscription};
    use uuid::Uuid;

    use super::*;

    fn replica() -> InMemorySubscriptionRepository {
        InMemorySubscriptionRepository::with_rows([sample_subscription(
            1,
            "Netflix",
            Decimal::new(1599, 2),
            Frequency::Monthly,
        )])
    }

    fn update(id: i64, amount: Decimal) -> UpdateSubscription {
        UpdateSubscription {
            correlation_id: Uuid::new_v4(),
            subscription_id: id,
            name: Some("Netflix Premium".to_owned()),
            description: Some("4K".to_owned()),
            amount: Some(amount),
            frequency: Some("MONTHLY".to_owned()),
            start_date: None,
            next_billing_date: None,
            active: None,
        }
    }

    fn toggle(id: i64) -> ToggleSubscriptionActive {
        ToggleSubscriptionActive {
            correlation_id: Uuid::new_v4(),
            subscription_id: id,
        }
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_keeps_identity() {
        // Arrange
        let repo = replica();

        // Act
        let updated = handle_update_subscription(&update(1, Decimal::new(2299, 2)), &repo)
            .await
            .unwrap();

        // Assert
        assert_eq!(updated.id, 1);
        assert_eq!(updated.name, "Netflix Premium");
        assert_eq!(updated.amount, Decimal::new(2299, 2));
        assert_eq!(updated.created_at, fixed_now());
        assert_eq!(updated.start_date, fixed_now());
        assert!(updated.active);
        assert_eq!(repo.snapshot(), vec![updated]);
    }

    #[tokio::test]
    async fn test_update_stores_next_billing_date_as_given() {
        // Arrange
        let repo = replica();
        let next = Utc.with_ymd_and_hms(2026, 2, 15, 0, 0, 0).unwrap();
        let command = UpdateSubscription {
            next_billing_date: Some(next),
            active: Some(false),
            ..update(1, Decimal::new(1599, 2))
        };

        // Act
        let updated = handle_update_subscription(&command, &repo).await.unwrap();

        // Assert
        assert_eq!(updated.next_billing_date, Some(next));
        assert!(!updated.active);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        // Act
        let result = handle_update_subscription(&update(42, Decimal::ONE), &replica()).await;

        // Assert
        assert!(matches!(result, Err(DomainError::SubscriptionNotFound(42))));
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_amount_before_touching_store() {
        // Arrange
        let repo = replica();

        // Act
        let result = handle_update_subscription(&update(1, Decimal::ZERO), &repo).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(repo.snapshot()[0].amount, Decimal::new(1599, 2));
    }

    #[tokio::test]
    async fn test_toggle_round_trips() {
        // Arrange
        let repo = replica();

        // Act
        let first = handle_toggle_subscription_active(&toggle(1), &repo).await.unwrap();
        let second = handle_toggle_subscription_active(&toggle(1), &repo).await.unwrap();

        // Assert
        assert!(!first.active);
        assert!(second.active);
    }

    #[tokio::test]
    async fn test_toggle_unknown_id_is_not_found() {
        // Act
        let result = handle_toggle_subscription_active(&toggle(5), &replica()).await;

        // Assert
        assert!(matches!(result, Err(DomainError::SubscriptionNotFound(5))));
    }

    #[tokio::test]
    async fn test_delete_removes_row_then_reports_not_found() {
        // Arrange
        let repo = replica();
        let command = DeleteSubscription {
            correlation_id: Uuid::new_v4(),
            subscription_id: 1,
        };

        // Act
        let first = handle_delete_subscription(&command, &repo).await;
        let second = handle_delete_subscription(&command, &repo).await;

        // Assert
        assert!(first.is_ok());
        assert!(matches!(second, Err(DomainError::SubscriptionNotFound(1))));
        assert!(repo.snapshot().is_empty());
    }
}
