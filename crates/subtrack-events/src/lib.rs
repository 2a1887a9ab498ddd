//! Event channel transports.
//!
//! Two transports carry `SubscriptionCreatedEvent`s from the creation
//! service to the sync listener:
//!
//! - [`local`]: an in-process channel, for running both services in one
//!   process and for tests.
//! - [`kafka`] (feature `kafka`): the `subscription-created` topic, keyed by
//!   subscription id.
//!
//! Both hand each delivery to an `EventHandler` and neither layers retries,
//! backoff, or a dead-letter queue on top of what the transport does itself.

pub mod local;
pub mod noop;

#[cfg(feature = "kafka")]
pub mod kafka;

pub use local::{ConsumerStats, LocalEventChannel, LocalEventPublisher, LocalEventReceiver};
pub use noop::DiscardingEventPublisher;
