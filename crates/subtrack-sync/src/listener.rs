//! The Sync Listener.

use std::sync::Arc;

use async_trait::async_trait;
use subtrack_core::error::DomainError;
use subtrack_core::event::SubscriptionCreatedEvent;
use subtrack_core::publisher::EventHandler;
use subtrack_core::repository::SubscriptionRepository;
use tracing::{error, info};

/// Upserts each delivered creation event into the replica store under the
/// event's own subscription id. Replaying an event is a no-op change.
#[derive(Clone)]
pub struct SyncListener {
    replica: Arc<dyn SubscriptionRepository>,
}

impl std::fmt::Debug for SyncListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncListener").finish_non_exhaustive()
    }
}

impl SyncListener {
    /// Creates a listener writing to `replica`.
    #[must_use]
    pub fn new(replica: Arc<dyn SubscriptionRepository>) -> Self {
        Self { replica }
    }
}

#[async_trait]
impl EventHandler for SyncListener {
    async fn handle(&self, event: SubscriptionCreatedEvent) -> Result<(), DomainError> {
        let subscription = event.to_subscription();
        match self.replica.upsert(&subscription).await {
            Ok(()) => {
                info!(
                    subscription_id = subscription.id,
                    event_timestamp = %event.event_timestamp,
                    "replica synced from creation event"
                );
                Ok(())
            }
            Err(e) => {
                error!(
                    subscription_id = subscription.id,
                    error = %e,
                    "replica upsert failed"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use subtrack_core::error::DomainError;
    use subtrack_core::event::SubscriptionCreatedEvent;
    use subtrack_core::frequency::Frequency;
    use subtrack_core::publisher::EventHandler;
    use subtrack_test_support::{
        FailingSubscriptionRepository, InMemorySubscriptionRepository, fixed_now,
        sample_subscription,
    };

    use super::SyncListener;

    fn event(id: i64, amount: Decimal) -> SubscriptionCreatedEvent {
        let source = sample_subscription(id, "Spotify", amount, Frequency::Monthly);
        SubscriptionCreatedEvent::from_subscription(&source, fixed_now())
    }

    #[tokio::test]
    async fn test_replayed_event_leaves_exactly_one_row() {
        // Arrange
        let replica = Arc::new(InMemorySubscriptionRepository::new());
        let listener = SyncListener::new(replica.clone());
        let event = event(42, Decimal::new(999, 2));

        // Act
        listener.handle(event.clone()).await.unwrap();
        listener.handle(event.clone()).await.unwrap();

        // Assert
        let rows = replica.snapshot();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], event.to_subscription());
        assert_eq!(rows[0].id, 42);
    }

    #[tokio::test]
    async fn test_later_delivery_for_same_id_wins() {
        // Arrange
        let replica = Arc::new(InMemorySubscriptionRepository::new());
        let listener = SyncListener::new(replica.clone());

        // Act
        listener.handle(event(7, Decimal::new(999, 2))).await.unwrap();
        listener.handle(event(7, Decimal::new(1199, 2))).await.unwrap();

        // Assert
        let rows = replica.snapshot();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, Decimal::new(1199, 2));
    }

    #[tokio::test]
    async fn test_upsert_failure_is_returned_to_the_transport() {
        // Arrange
        let listener = SyncListener::new(Arc::new(FailingSubscriptionRepository));

        // Act
        let result = listener.handle(event(1, Decimal::ONE)).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Unavailable(_))));
    }
}
