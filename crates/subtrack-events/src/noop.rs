//! Publisher used when no event transport is configured.

use async_trait::async_trait;
use tracing::warn;

use subtrack_core::error::DomainError;
use subtrack_core::event::SubscriptionCreatedEvent;
use subtrack_core::publisher::EventPublisher;

/// Drops every event. The replica never hears about creations made while
/// this publisher is installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardingEventPublisher;

#[async_trait]
impl EventPublisher for DiscardingEventPublisher {
    async fn publish(&self, event: &SubscriptionCreatedEvent) -> Result<(), DomainError> {
        warn!(
            subscription_id = event.subscription_id,
            "no event transport configured, creation event discarded"
        );
        Ok(())
    }
}
