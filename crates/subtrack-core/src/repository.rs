//! Subscription repository abstraction.
//!
//! Both the creation store and the query-owned replica implement this
//! trait. The creation store assigns ids through [`SubscriptionRepository::insert`];
//! the replica only ever receives explicit ids through
//! [`SubscriptionRepository::upsert`].

use async_trait::async_trait;

use crate::error::DomainError;
use crate::frequency::Frequency;
use crate::subscription::{NewSubscription, Subscription};

/// Repository trait for storing and querying subscriptions.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Inserts a new row and returns it with its assigned id.
    async fn insert(&self, subscription: NewSubscription) -> Result<Subscription, DomainError>;

    /// Inserts or replaces the row keyed by `subscription.id`.
    async fn upsert(&self, subscription: &Subscription) -> Result<(), DomainError>;

    /// Loads a single row.
    async fn find_by_id(&self, id: i64) -> Result<Option<Subscription>, DomainError>;

    /// Loads every row, ordered by id.
    async fn find_all(&self) -> Result<Vec<Subscription>, DomainError>;

    /// Loads rows with `active = true`, ordered by id.
    async fn find_active(&self) -> Result<Vec<Subscription>, DomainError>;

    /// Loads rows whose name contains `fragment`, ignoring case.
    async fn find_by_name_containing(&self, fragment: &str)
    -> Result<Vec<Subscription>, DomainError>;

    /// Loads rows with the given frequency, ordered by id.
    async fn find_by_frequency(&self, frequency: Frequency)
    -> Result<Vec<Subscription>, DomainError>;

    /// Flips `active` in place and returns the updated row, or `None` if
    /// no row has that id.
    async fn toggle_active(&self, id: i64) -> Result<Option<Subscription>, DomainError>;

    /// Deletes a row. Returns `false` if no row had that id.
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;

    /// Number of stored rows.
    async fn count(&self) -> Result<i64, DomainError>;
}
