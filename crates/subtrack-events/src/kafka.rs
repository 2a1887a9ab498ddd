//! Kafka transport for creation events.
//!
//! The producer keys every record by subscription id so all events for one
//! subscription share a partition. The consumer disables auto-commit and
//! commits an offset only after the handler has applied the event;
//! undecodable payloads are logged and committed so they cannot wedge the
//! partition.

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::{ClientConfig, RDKafkaLogLevel};
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::error::KafkaError;
use rdkafka::message::{BorrowedMessage, Header, Message, OwnedHeaders};
use rdkafka::producer::{FutureProducer, FutureRecord};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use subtrack_core::error::DomainError;
use subtrack_core::event::{
    SUBSCRIPTION_CREATED_EVENT_TYPE, SUBSCRIPTION_CREATED_TOPIC, SUBSCRIPTION_SYNC_GROUP,
    SubscriptionCreatedEvent,
};
use subtrack_core::publisher::{EventHandler, EventPublisher};

use crate::local::ConsumerStats;

/// Connection settings shared by producer and consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KafkaSettings {
    /// Comma-separated `host:port` list.
    pub brokers: String,
    /// Topic carrying creation events.
    pub topic: String,
    /// Consumer group of the sync listener.
    pub group_id: String,
}

impl KafkaSettings {
    /// Settings for `brokers` with the default topic and group.
    #[must_use]
    pub fn new(brokers: impl Into<String>) -> Self {
        Self {
            brokers: brokers.into(),
            topic: SUBSCRIPTION_CREATED_TOPIC.to_owned(),
            group_id: SUBSCRIPTION_SYNC_GROUP.to_owned(),
        }
    }
}

fn kafka_unavailable(context: &str, err: &KafkaError) -> DomainError {
    error!(error = %err, "{context}");
    DomainError::Unavailable(format!("{context}: {err}"))
}

/// Publishes creation events to the configured topic.
pub struct KafkaEventPublisher {
    producer: FutureProducer,
    topic: String,
}

impl std::fmt::Debug for KafkaEventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KafkaEventPublisher")
            .field("topic", &self.topic)
            .finish_non_exhaustive()
    }
}

impl KafkaEventPublisher {
    /// Builds a producer for `settings`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unavailable` if the client cannot be created.
    pub fn new(settings: &KafkaSettings) -> Result<Self, DomainError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &settings.brokers)
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|e| kafka_unavailable("failed to create Kafka producer", &e))?;
        Ok(Self {
            producer,
            topic: settings.topic.clone(),
        })
    }
}

#[async_trait]
impl EventPublisher for KafkaEventPublisher {
    async fn publish(&self, event: &SubscriptionCreatedEvent) -> Result<(), DomainError> {
        let key = event.partition_key();
        let payload = event.to_payload()?;
        let record = FutureRecord::to(&self.topic)
            .key(&key)
            .payload(&payload)
            .headers(OwnedHeaders::new().insert(Header {
                key: "eventType",
                value: Some(SUBSCRIPTION_CREATED_EVENT_TYPE),
            }));

        match self.producer.send(record, Duration::from_secs(0)).await {
            Ok(delivery) => {
                debug!(key, ?delivery, "creation event delivered");
                Ok(())
            }
            Err((e, _)) => Err(kafka_unavailable("failed to deliver creation event", &e)),
        }
    }
}

/// Builds the sync listener's consumer and subscribes it to the topic.
///
/// # Errors
///
/// Returns `DomainError::Unavailable` if the client cannot be created or
/// the subscription fails.
pub fn sync_consumer(settings: &KafkaSettings) -> Result<StreamConsumer, DomainError> {
    let consumer: StreamConsumer = ClientConfig::new()
        .set("group.id", &settings.group_id)
        .set("bootstrap.servers", &settings.brokers)
        .set("enable.partition.eof", "false")
        .set("session.timeout.ms", "6000")
        .set("enable.auto.commit", "false")
        .set("auto.offset.reset", "earliest")
        .set_log_level(RDKafkaLogLevel::Info)
        .create()
        .map_err(|e| kafka_unavailable("failed to create Kafka consumer", &e))?;

    consumer
        .subscribe(&[settings.topic.as_str()])
        .map_err(|e| kafka_unavailable("failed to subscribe to creation topic", &e))?;
    Ok(consumer)
}

fn commit(consumer: &StreamConsumer, message: &BorrowedMessage<'_>) {
    if let Err(e) = consumer.commit_message(message, CommitMode::Async) {
        warn!(error = %e, offset = message.offset(), "offset commit failed");
    }
}

/// Feeds every record on the topic to `handler` until `shutdown` fires.
///
/// A record whose handler call fails is left uncommitted and logged; it
/// is not retried in this process.
pub async fn run_kafka_consumer(
    consumer: StreamConsumer,
    handler: &dyn EventHandler,
    shutdown: CancellationToken,
) -> ConsumerStats {
    info!("kafka sync consumer started");
    let mut stats = ConsumerStats::default();

    loop {
        let message = tokio::select! {
            () = shutdown.cancelled() => break,
            received = consumer.recv() => match received {
                Ok(message) => message,
                Err(e) => {
                    warn!(error = %e, "kafka receive failed");
                    continue;
                }
            },
        };

        let event = match SubscriptionCreatedEvent::from_payload(message.payload().unwrap_or_default()) {
            Ok(event) => event,
            Err(e) => {
                warn!(
                    partition = message.partition(),
                    offset = message.offset(),
                    error = %e,
                    "skipping undecodable event payload"
                );
                stats.undecodable += 1;
                commit(&consumer, &message);
                continue;
            }
        };

        let subscription_id = event.subscription_id;
        match handler.handle(event).await {
            Ok(()) => {
                stats.applied += 1;
                commit(&consumer, &message);
            }
            Err(e) => {
                error!(
                    subscription_id,
                    partition = message.partition(),
                    offset = message.offset(),
                    error = %e,
                    "event handler failed, offset not committed"
                );
                stats.failed += 1;
            }
        }
    }

    info!(
        applied = stats.applied,
        failed = stats.failed,
        undecodable = stats.undecodable,
        "kafka sync consumer stopped"
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_to_shared_topic_and_group() {
        let settings = KafkaSettings::new("localhost:9092");
        assert_eq!(settings.topic, "subscription-created");
        assert_eq!(settings.group_id, "subscription-manager-group");
    }
}
