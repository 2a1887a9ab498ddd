//! Test publishers and handlers for the event channel seams.

use std::sync::Mutex;

use async_trait::async_trait;
use subtrack_core::error::DomainError;
use subtrack_core::event::SubscriptionCreatedEvent;
use subtrack_core::publisher::{EventHandler, EventPublisher};

/// A publisher that records every event and always succeeds.
#[derive(Debug, Default)]
pub struct RecordingEventPublisher {
    published: Mutex<Vec<SubscriptionCreatedEvent>>,
}

impl RecordingEventPublisher {
    /// Creates a publisher with nothing recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all events that were published.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn published(&self) -> Vec<SubscriptionCreatedEvent> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingEventPublisher {
    async fn publish(&self, event: &SubscriptionCreatedEvent) -> Result<(), DomainError> {
        self.published.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// A publisher that always fails, as if the broker were down.
#[derive(Debug)]
pub struct FailingEventPublisher;

#[async_trait]
impl EventPublisher for FailingEventPublisher {
    async fn publish(&self, _event: &SubscriptionCreatedEvent) -> Result<(), DomainError> {
        Err(DomainError::Unavailable("broker unreachable".into()))
    }
}

/// A handler that records every delivered event and always succeeds.
#[derive(Debug, Default)]
pub struct RecordingEventHandler {
    handled: Mutex<Vec<SubscriptionCreatedEvent>>,
}

impl RecordingEventHandler {
    /// Creates a handler with nothing recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all delivered events, in delivery order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn handled(&self) -> Vec<SubscriptionCreatedEvent> {
        self.handled.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventHandler for RecordingEventHandler {
    async fn handle(&self, event: SubscriptionCreatedEvent) -> Result<(), DomainError> {
        self.handled.lock().unwrap().push(event);
        Ok(())
    }
}
