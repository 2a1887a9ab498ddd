//! `SubscriptionRepository` implementations for tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use subtrack_core::error::DomainError;
use subtrack_core::frequency::Frequency;
use subtrack_core::repository::SubscriptionRepository;
use subtrack_core::subscription::{NewSubscription, Subscription};

#[derive(Debug)]
struct Rows {
    by_id: BTreeMap<i64, Subscription>,
    next_id: i64,
}

/// A repository that keeps rows in memory, ordered by id. Ids are assigned
/// from a counter starting at 1, the way an identity column does.
#[derive(Debug)]
pub struct InMemorySubscriptionRepository {
    rows: Mutex<Rows>,
}

impl Default for InMemorySubscriptionRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySubscriptionRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Rows {
                by_id: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Creates a repository pre-populated with `subscriptions`.
    #[must_use]
    pub fn with_rows(subscriptions: impl IntoIterator<Item = Subscription>) -> Self {
        let repo = Self::new();
        {
            let mut rows = repo.rows.lock().unwrap();
            for subscription in subscriptions {
                rows.next_id = rows.next_id.max(subscription.id + 1);
                rows.by_id.insert(subscription.id, subscription);
            }
        }
        repo
    }

    /// Returns a snapshot of every stored row, ordered by id.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn snapshot(&self) -> Vec<Subscription> {
        self.rows.lock().unwrap().by_id.values().cloned().collect()
    }

    fn filtered(&self, keep: impl Fn(&Subscription) -> bool) -> Vec<Subscription> {
        self.rows
            .lock()
            .unwrap()
            .by_id
            .values()
            .filter(|s| keep(s))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn insert(&self, subscription: NewSubscription) -> Result<Subscription, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.next_id;
        rows.next_id += 1;
        let stored = subscription.with_id(id);
        rows.by_id.insert(id, stored.clone());
        Ok(stored)
    }

    async fn upsert(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let mut rows = self.rows.lock().unwrap();
        rows.next_id = rows.next_id.max(subscription.id + 1);
        rows.by_id.insert(subscription.id, subscription.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Subscription>, DomainError> {
        Ok(self.rows.lock().unwrap().by_id.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Subscription>, DomainError> {
        Ok(self.snapshot())
    }

    async fn find_active(&self) -> Result<Vec<Subscription>, DomainError> {
        Ok(self.filtered(|s| s.active))
    }

    async fn find_by_name_containing(
        &self,
        fragment: &str,
    ) -> Result<Vec<Subscription>, DomainError> {
        let needle = fragment.to_lowercase();
        Ok(self.filtered(|s| s.name.to_lowercase().contains(&needle)))
    }

    async fn find_by_frequency(
        &self,
        frequency: Frequency,
    ) -> Result<Vec<Subscription>, DomainError> {
        Ok(self.filtered(|s| s.frequency == frequency))
    }

    async fn toggle_active(&self, id: i64) -> Result<Option<Subscription>, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.by_id.get_mut(&id).map(|s| {
            s.active = !s.active;
            s.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        Ok(self.rows.lock().unwrap().by_id.remove(&id).is_some())
    }

    async fn count(&self) -> Result<i64, DomainError> {
        let len = self.rows.lock().unwrap().by_id.len();
        Ok(i64::try_from(len).unwrap_or(i64::MAX))
    }
}

/// A repository whose every call fails with an unavailable error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingSubscriptionRepository;

fn connection_refused<T>() -> Result<T, DomainError> {
    Err(DomainError::Unavailable("connection refused".into()))
}

#[async_trait]
impl SubscriptionRepository for FailingSubscriptionRepository {
    async fn insert(&self, _subscription: NewSubscription) -> Result<Subscription, DomainError> {
        connection_refused()
    }

    async fn upsert(&self, _subscription: &Subscription) -> Result<(), DomainError> {
        connection_refused()
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<Subscription>, DomainError> {
        connection_refused()
    }

    async fn find_all(&self) -> Result<Vec<Subscription>, DomainError> {
        connection_refused()
    }

    async fn find_active(&self) -> Result<Vec<Subscription>, DomainError> {
        connection_refused()
    }

    async fn find_by_name_containing(
        &self,
        _fragment: &str,
    ) -> Result<Vec<Subscription>, DomainError> {
        connection_refused()
    }

    async fn find_by_frequency(
        &self,
        _frequency: Frequency,
    ) -> Result<Vec<Subscription>, DomainError> {
        connection_refused()
    }

    async fn toggle_active(&self, _id: i64) -> Result<Option<Subscription>, DomainError> {
        connection_refused()
    }

    async fn delete(&self, _id: i64) -> Result<bool, DomainError> {
        connection_refused()
    }

    async fn count(&self) -> Result<i64, DomainError> {
        connection_refused()
    }
}
