//! How the Read/Query Service reaches the Creation Service.
//!
//! `POST /api/subscriptions` on the query side never writes the replica.
//! It hands the request to the creation side and returns what that side
//! stored; the replica catches up through the event channel.

use std::sync::Arc;

use async_trait::async_trait;
use subtrack_client::{ClientError, HttpSubscriptionApi, SubscriptionApi};
use subtrack_core::clock::Clock;
use subtrack_core::command::new_correlation_id;
use subtrack_core::error::DomainError;
use subtrack_core::publisher::EventPublisher;
use subtrack_core::repository::SubscriptionRepository;
use subtrack_core::request::CreateSubscriptionRequest;
use subtrack_core::resolver::{CREATION_SERVICE, ServiceResolver};
use subtrack_core::subscription::SubscriptionView;
use subtrack_creation::application::command_handlers;
use subtrack_creation::domain::commands::CreateSubscription;
use tracing::warn;

/// Forwards a creation request to the Creation Service.
#[async_trait]
pub trait CreationClient: Send + Sync {
    /// Creates the subscription and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the creation side rejected the
    /// input, or `DomainError::Unavailable` if it could not be reached.
    async fn create(
        &self,
        request: &CreateSubscriptionRequest,
    ) -> Result<SubscriptionView, DomainError>;
}

/// Builds the creation command for an incoming request.
#[must_use]
pub fn create_command(request: &CreateSubscriptionRequest) -> CreateSubscription {
    CreateSubscription {
        correlation_id: new_correlation_id(),
        name: request.name.clone(),
        description: request.description.clone(),
        amount: request.amount,
        frequency: request.frequency.clone(),
        active: request.is_active.unwrap_or(true),
        start_date: request.start_date,
    }
}

/// Calls a remote Creation Service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCreationClient {
    api: HttpSubscriptionApi,
}

impl HttpCreationClient {
    /// Creates a client for the Creation Service as `resolver` locates it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unavailable` if the service name is unknown or
    /// the HTTP client cannot be built.
    pub fn from_resolver(resolver: &dyn ServiceResolver) -> Result<Self, DomainError> {
        let api = HttpSubscriptionApi::from_resolver(resolver, CREATION_SERVICE)
            .map_err(|e| DomainError::Unavailable(format!("creation client setup failed: {e}")))?;
        Ok(Self { api })
    }
}

fn forwarded_error(err: ClientError) -> DomainError {
    match err {
        ClientError::Status {
            status: 400,
            message,
        } => DomainError::Validation(
            message
                .strip_prefix("validation error: ")
                .map_or_else(|| message.clone(), str::to_owned),
        ),
        other => {
            warn!(error = %other, "creation service call failed");
            DomainError::Unavailable(format!("creation service unavailable: {other}"))
        }
    }
}

#[async_trait]
impl CreationClient for HttpCreationClient {
    async fn create(
        &self,
        request: &CreateSubscriptionRequest,
    ) -> Result<SubscriptionView, DomainError> {
        self.api.create(request).await.map_err(forwarded_error)
    }
}

/// Runs the creation handler in this process, against the creation store.
#[derive(Clone)]
pub struct InProcessCreationClient {
    clock: Arc<dyn Clock>,
    repository: Arc<dyn SubscriptionRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl InProcessCreationClient {
    /// Creates a client writing through `repository` and `publisher`.
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

impl std::fmt::Debug for InProcessCreationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InProcessCreationClient").finish_non_exhaustive()
    }
}

#[async_trait]
impl CreationClient for InProcessCreationClient {
    async fn create(
        &self,
        request: &CreateSubscriptionRequest,
    ) -> Result<SubscriptionView, DomainError> {
        let command = create_command(request);
        let created = command_handlers::handle_create_subscription(
            &command,
            self.clock.as_ref(),
            &*self.repository,
            Arc::clone(&self.publisher),
        )
        .await?;
        Ok(SubscriptionView::from(created.subscription))
    }
}
