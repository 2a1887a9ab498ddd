//! In-process event channel.
//!
//! Events are encoded to the same JSON payload the Kafka transport uses and
//! pass through a single unbounded queue, so delivery order equals publish
//! order for every key. Delivery is at-most-once: a failed handler call is
//! logged and the event is dropped.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use subtrack_core::error::DomainError;
use subtrack_core::event::SubscriptionCreatedEvent;
use subtrack_core::publisher::{EventHandler, EventPublisher};

/// A keyed, encoded event in flight.
#[derive(Debug, Clone)]
struct Envelope {
    key: String,
    payload: Vec<u8>,
}

/// Factory for a connected publisher/receiver pair.
#[derive(Debug)]
pub struct LocalEventChannel;

impl LocalEventChannel {
    /// Creates a connected publisher and receiver.
    #[must_use]
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (LocalEventPublisher, LocalEventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (LocalEventPublisher { tx }, LocalEventReceiver { rx })
    }
}

/// Sending half of the in-process channel. Cheap to clone.
#[derive(Debug, Clone)]
pub struct LocalEventPublisher {
    tx: mpsc::UnboundedSender<Envelope>,
}

#[async_trait]
impl EventPublisher for LocalEventPublisher {
    async fn publish(&self, event: &SubscriptionCreatedEvent) -> Result<(), DomainError> {
        let envelope = Envelope {
            key: event.partition_key(),
            payload: event.to_payload()?,
        };
        self.tx
            .send(envelope)
            .map_err(|_| DomainError::Unavailable("local event channel is closed".into()))
    }
}

/// Counts of what a consumer run did with its deliveries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerStats {
    /// Deliveries the handler accepted.
    pub applied: u64,
    /// Deliveries the handler rejected.
    pub failed: u64,
    /// Payloads that did not decode as an event.
    pub undecodable: u64,
}

/// Receiving half of the in-process channel.
#[derive(Debug)]
pub struct LocalEventReceiver {
    rx: mpsc::UnboundedReceiver<Envelope>,
}

impl LocalEventReceiver {
    /// Delivers events to `handler` one at a time until `shutdown` fires or
    /// every publisher has been dropped.
    pub async fn run(
        mut self,
        handler: &dyn EventHandler,
        shutdown: CancellationToken,
    ) -> ConsumerStats {
        info!("local event consumer started");
        let mut stats = ConsumerStats::default();

        loop {
            let envelope = tokio::select! {
                () = shutdown.cancelled() => break,
                next = self.rx.recv() => match next {
                    Some(envelope) => envelope,
                    None => break,
                },
            };

            let event = match SubscriptionCreatedEvent::from_payload(&envelope.payload) {
                Ok(event) => event,
                Err(e) => {
                    warn!(key = %envelope.key, error = %e, "skipping undecodable event payload");
                    stats.undecodable += 1;
                    continue;
                }
            };

            match handler.handle(event).await {
                Ok(()) => {
                    debug!(key = %envelope.key, "event applied");
                    stats.applied += 1;
                }
                Err(e) => {
                    error!(key = %envelope.key, error = %e, "event handler failed, event dropped");
                    stats.failed += 1;
                }
            }
        }

        info!(
            applied = stats.applied,
            failed = stats.failed,
            undecodable = stats.undecodable,
            "local event consumer stopped"
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use subtrack_core::frequency::Frequency;
    use subtrack_test_support::{RecordingEventHandler, fixed_now, sample_subscription};

    fn event(id: i64) -> SubscriptionCreatedEvent {
        let subscription = sample_subscription(id, "Netflix", Decimal::new(1599, 2), Frequency::Monthly);
        SubscriptionCreatedEvent::from_subscription(&subscription, fixed_now())
    }

    struct RejectingHandler;

    #[async_trait]
    impl EventHandler for RejectingHandler {
        async fn handle(&self, _event: SubscriptionCreatedEvent) -> Result<(), DomainError> {
            Err(DomainError::Unavailable("replica down".into()))
        }
    }

    #[tokio::test]
    async fn test_events_are_delivered_in_publish_order() {
        // Arrange
        let (publisher, receiver) = LocalEventChannel::new();
        let handler = RecordingEventHandler::new();
        for id in [3, 1, 2] {
            publisher.publish(&event(id)).await.unwrap();
        }
        drop(publisher);

        // Act
        let stats = receiver.run(&handler, CancellationToken::new()).await;

        // Assert
        assert_eq!(stats.applied, 3);
        let ids: Vec<i64> = handler.handled().iter().map(|e| e.subscription_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(handler.handled()[0], event(3));
    }

    #[tokio::test]
    async fn test_handler_failures_are_counted_and_dropped() {
        // Arrange
        let (publisher, receiver) = LocalEventChannel::new();
        publisher.publish(&event(1)).await.unwrap();
        drop(publisher);

        // Act
        let stats = receiver.run(&RejectingHandler, CancellationToken::new()).await;

        // Assert
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.applied, 0);
    }

    #[tokio::test]
    async fn test_consumer_stops_on_shutdown() {
        // Arrange
        let (_publisher, receiver) = LocalEventChannel::new();
        let handler = RecordingEventHandler::new();
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        // Act
        let stats = receiver.run(&handler, shutdown).await;

        // Assert
        assert_eq!(stats, ConsumerStats::default());
    }

    #[tokio::test]
    async fn test_publish_fails_once_receiver_is_gone() {
        // Arrange
        let (publisher, receiver) = LocalEventChannel::new();
        drop(receiver);

        // Act
        let result = publisher.publish(&event(1)).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Unavailable(_))));
    }
}
