//! Shared application state.

use std::sync::Arc;

use subtrack_core::clock::Clock;
use subtrack_core::publisher::EventPublisher;
use subtrack_core::repository::SubscriptionRepository;

use crate::creation_client::CreationClient;

/// State of the Creation Service handlers.
#[derive(Clone)]
pub struct CreationState {
    /// Clock for `created_at` and event timestamps.
    pub clock: Arc<dyn Clock>,
    /// Creation-owned store.
    pub repository: Arc<dyn SubscriptionRepository>,
    /// Event channel the creation events go to.
    pub publisher: Arc<dyn EventPublisher>,
}

impl CreationState {
    /// Create new creation state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        repository: Arc<dyn SubscriptionRepository>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            clock,
            repository,
            publisher,
        }
    }
}

impl std::fmt::Debug for CreationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreationState")
            .field("clock", &"<dyn Clock>")
            .field("repository", &"<dyn SubscriptionRepository>")
            .field("publisher", &"<dyn EventPublisher>")
            .finish()
    }
}

/// State of the Read/Query Service handlers.
#[derive(Clone)]
pub struct QueryState {
    /// Replica store.
    pub repository: Arc<dyn SubscriptionRepository>,
    /// Where `POST` is forwarded.
    pub creation_client: Arc<dyn CreationClient>,
}

impl QueryState {
    /// Create new query state.
    #[must_use]
    pub fn new(
        repository: Arc<dyn SubscriptionRepository>,
        creation_client: Arc<dyn CreationClient>,
    ) -> Self {
        Self {
            repository,
            creation_client,
        }
    }
}

impl std::fmt::Debug for QueryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryState")
            .field("repository", &"<dyn SubscriptionRepository>")
            .field("creation_client", &"<dyn CreationClient>")
            .finish()
    }
}
