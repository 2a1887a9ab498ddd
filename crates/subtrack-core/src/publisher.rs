//! Event channel seams: publishing and handling creation events.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::event::SubscriptionCreatedEvent;

/// Publishes creation events to the event channel.
///
/// Implementations key each event by [`SubscriptionCreatedEvent::partition_key`]
/// so events for one subscription stay ordered.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes `event` and resolves once the channel has acknowledged it.
    async fn publish(&self, event: &SubscriptionCreatedEvent) -> Result<(), DomainError>;
}

/// Consumes creation events delivered by the event channel.
///
/// Transports call this once per delivery. An `Err` leaves the delivery
/// unacknowledged; whether it is redelivered is up to the transport.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Applies one delivered event.
    async fn handle(&self, event: SubscriptionCreatedEvent) -> Result<(), DomainError>;
}
