//! The remote operations the client issues.

use async_trait::async_trait;
use subtrack_core::frequency::Frequency;
use subtrack_core::request::{CreateSubscriptionRequest, UpdateSubscriptionRequest};
use subtrack_core::subscription::SubscriptionView;
use subtrack_core::totals::SubscriptionTotals;

use crate::error::ClientError;

/// Remote subscription operations, one per REST endpoint.
#[async_trait]
pub trait SubscriptionApi: Send + Sync {
    /// `GET /api/subscriptions`.
    async fn get_all(&self) -> Result<Vec<SubscriptionView>, ClientError>;

    /// `GET /api/subscriptions/active`.
    async fn get_active(&self) -> Result<Vec<SubscriptionView>, ClientError>;

    /// `GET /api/subscriptions/{id}`.
    async fn get(&self, id: i64) -> Result<SubscriptionView, ClientError>;

    /// `GET /api/subscriptions/search?name=`.
    async fn search(&self, name: &str) -> Result<Vec<SubscriptionView>, ClientError>;

    /// `GET /api/subscriptions/by-frequency/{frequency}`.
    async fn by_frequency(&self, frequency: Frequency)
    -> Result<Vec<SubscriptionView>, ClientError>;

    /// `GET /api/subscriptions/totals`.
    async fn totals(&self) -> Result<SubscriptionTotals, ClientError>;

    /// `POST /api/subscriptions`.
    async fn create(
        &self,
        request: &CreateSubscriptionRequest,
    ) -> Result<SubscriptionView, ClientError>;

    /// `PUT /api/subscriptions/{id}`.
    async fn update(
        &self,
        id: i64,
        request: &UpdateSubscriptionRequest,
    ) -> Result<SubscriptionView, ClientError>;

    /// `PATCH /api/subscriptions/{id}/toggle-active`.
    async fn toggle_active(&self, id: i64) -> Result<SubscriptionView, ClientError>;

    /// `DELETE /api/subscriptions/{id}`.
    async fn delete(&self, id: i64) -> Result<(), ClientError>;
}
