//! Read side of the Creation Service: its own store, as stored.

use subtrack_core::error::DomainError;
use subtrack_core::repository::SubscriptionRepository;
use subtrack_core::subscription::SubscriptionView;

/// Lists every subscription in the creation-owned store, ordered by id.
///
/// # Errors
///
/// Returns `DomainError::Unavailable` if the store cannot be read.
pub async fn list_subscriptions(
    repo: &dyn SubscriptionRepository,
) -> Result<Vec<SubscriptionView>, DomainError> {
    let subscriptions = repo.find_all().await?;
    Ok(subscriptions.into_iter().map(SubscriptionView::from).collect())
}
