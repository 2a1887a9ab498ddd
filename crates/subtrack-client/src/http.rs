//! reqwest implementation of [`SubscriptionApi`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use subtrack_core::frequency::Frequency;
use subtrack_core::request::{CreateSubscriptionRequest, UpdateSubscriptionRequest};
use subtrack_core::resolver::ServiceResolver;
use subtrack_core::subscription::SubscriptionView;
use subtrack_core::totals::SubscriptionTotals;
use tracing::debug;

use crate::api::SubscriptionApi;
use crate::error::ClientError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Talks to a service exposing `/api/subscriptions`.
#[derive(Debug, Clone)]
pub struct HttpSubscriptionApi {
    client: Client,
    base_url: String,
}

impl HttpSubscriptionApi {
    /// Creates a client for the service at `base_url` (scheme, host, port).
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    /// Creates a client for the service `name` as resolved by `resolver`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Resolve` if the name is unknown, or
    /// `ClientError::Transport` if the HTTP client cannot be built.
    pub fn from_resolver(resolver: &dyn ServiceResolver, name: &str) -> Result<Self, ClientError> {
        Self::new(resolver.resolve(name)?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/subscriptions{path}", self.base_url)
    }

    async fn send(request: RequestBuilder, id: Option<i64>) -> Result<Response, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if let (StatusCode::NOT_FOUND, Some(id)) = (status, id) {
            return Err(ClientError::NotFound(id));
        }

        let reason = status.canonical_reason().unwrap_or("error").to_owned();
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => reason,
        };
        debug!(status = status.as_u16(), %message, "request rejected");
        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch<T: DeserializeOwned>(
        request: RequestBuilder,
        id: Option<i64>,
    ) -> Result<T, ClientError> {
        Ok(Self::send(request, id).await?.json::<T>().await?)
    }
}

#[async_trait]
impl SubscriptionApi for HttpSubscriptionApi {
    async fn get_all(&self) -> Result<Vec<SubscriptionView>, ClientError> {
        Self::fetch(self.client.get(self.url("")), None).await
    }

    async fn get_active(&self) -> Result<Vec<SubscriptionView>, ClientError> {
        Self::fetch(self.client.get(self.url("/active")), None).await
    }

    async fn get(&self, id: i64) -> Result<SubscriptionView, ClientError> {
        Self::fetch(self.client.get(self.url(&format!("/{id}"))), Some(id)).await
    }

    async fn search(&self, name: &str) -> Result<Vec<SubscriptionView>, ClientError> {
        let request = self.client.get(self.url("/search")).query(&[("name", name)]);
        Self::fetch(request, None).await
    }

    async fn by_frequency(
        &self,
        frequency: Frequency,
    ) -> Result<Vec<SubscriptionView>, ClientError> {
        let path = format!("/by-frequency/{}", frequency.as_str());
        Self::fetch(self.client.get(self.url(&path)), None).await
    }

    async fn totals(&self) -> Result<SubscriptionTotals, ClientError> {
        Self::fetch(self.client.get(self.url("/totals")), None).await
    }

    async fn create(
        &self,
        request: &CreateSubscriptionRequest,
    ) -> Result<SubscriptionView, ClientError> {
        Self::fetch(self.client.post(self.url("")).json(request), None).await
    }

    async fn update(
        &self,
        id: i64,
        request: &UpdateSubscriptionRequest,
    ) -> Result<SubscriptionView, ClientError> {
        let builder = self.client.put(self.url(&format!("/{id}"))).json(request);
        Self::fetch(builder, Some(id)).await
    }

    async fn toggle_active(&self, id: i64) -> Result<SubscriptionView, ClientError> {
        let builder = self.client.patch(self.url(&format!("/{id}/toggle-active")));
        Self::fetch(builder, Some(id)).await
    }

    async fn delete(&self, id: i64) -> Result<(), ClientError> {
        Self::send(self.client.delete(self.url(&format!("/{id}"))), Some(id)).await?;
        Ok(())
    }
}
