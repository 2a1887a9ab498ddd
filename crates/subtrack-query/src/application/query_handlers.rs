//! Query handlers for the Read/Query Service.
//!
//! Every handler reads the replica store and returns `SubscriptionView`s,
//! which carry the derived monthly and yearly amounts.

use subtrack_core::error::DomainError;
use subtrack_core::frequency::Frequency;
use subtrack_core::repository::SubscriptionRepository;
use subtrack_core::subscription::{Subscription, SubscriptionView};
use subtrack_core::totals::SubscriptionTotals;

fn views(subscriptions: Vec<Subscription>) -> Vec<SubscriptionView> {
    subscriptions.into_iter().map(SubscriptionView::from).collect()
}

/// Lists every subscription, ordered by id.
///
/// # Errors
///
/// Returns `DomainError::Unavailable` if the store cannot be read.
pub async fn list_subscriptions(
    repo: &dyn SubscriptionRepository,
) -> Result<Vec<SubscriptionView>, DomainError> {
    Ok(views(repo.find_all().await?))
}

/// Lists subscriptions with `active = true`.
///
/// # Errors
///
/// Returns `DomainError::Unavailable` if the store cannot be read.
pub async fn list_active_subscriptions(
    repo: &dyn SubscriptionRepository,
) -> Result<Vec<SubscriptionView>, DomainError> {
    Ok(views(repo.find_active().await?))
}

/// Lists subscriptions whose name contains `name`, ignoring case. An empty
/// fragment matches everything.
///
/// # Errors
///
/// Returns `DomainError::Unavailable` if the store cannot be read.
pub async fn search_subscriptions(
    name: &str,
    repo: &dyn SubscriptionRepository,
) -> Result<Vec<SubscriptionView>, DomainError> {
    Ok(views(repo.find_by_name_containing(name).await?))
}

/// Lists subscriptions billed at `frequency`, given as text.
///
/// # Errors
///
/// Returns `DomainError::Validation` if `frequency` is not a known cadence.
/// Returns `DomainError::Unavailable` if the store cannot be read.
pub async fn list_by_frequency(
    frequency: &str,
    repo: &dyn SubscriptionRepository,
) -> Result<Vec<SubscriptionView>, DomainError> {
    let frequency: Frequency = frequency.parse()?;
    Ok(views(repo.find_by_frequency(frequency).await?))
}

/// Sums active subscriptions normalized to a month and to a year.
///
/// # Errors
///
/// Returns `DomainError::Unavailable` if the store cannot be read.
pub async fn subscription_totals(
    repo: &dyn SubscriptionRepository,
) -> Result<SubscriptionTotals, DomainError> {
    let active = repo.find_active().await?;
    Ok(SubscriptionTotals::from_subscriptions(&active))
}

/// Retrieves one subscription by id.
///
/// # Errors
///
/// Returns `DomainError::SubscriptionNotFound` if no row has this id.
/// Returns `DomainError::Unavailable` if the store cannot be read.
pub async fn get_subscription(
    id: i64,
    repo: &dyn SubscriptionRepository,
) -> Result<SubscriptionView, DomainError> {
    repo.find_by_id(id)
        .await?
        .map(SubscriptionView::from)
        .ok_or(DomainError::SubscriptionNotFound(id))
}
