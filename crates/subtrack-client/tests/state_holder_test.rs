//! Behaviour of `SubscriptionStateHolder` against an in-memory API.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use subtrack_client::{ClientError, SubscriptionApi, SubscriptionStateHolder};
use subtrack_core::frequency::Frequency;
use subtrack_core::repository::SubscriptionRepository;
use subtrack_core::request::{CreateSubscriptionRequest, UpdateSubscriptionRequest};
use subtrack_core::subscription::{NewSubscription, Subscription, SubscriptionView};
use subtrack_core::totals::SubscriptionTotals;
use subtrack_test_support::{InMemorySubscriptionRepository, fixed_now, sample_subscription};

/// Serves the REST operations from an in-memory store.
struct FakeApi {
    store: InMemorySubscriptionRepository,
    failing: AtomicBool,
    toggle_delays: Mutex<VecDeque<Duration>>,
    searches: Mutex<Vec<String>>,
}

impl FakeApi {
    fn with_rows(rows: impl IntoIterator<Item = Subscription>) -> Arc<Self> {
        Arc::new(Self {
            store: InMemorySubscriptionRepository::with_rows(rows),
            failing: AtomicBool::new(false),
            toggle_delays: Mutex::new(VecDeque::new()),
            searches: Mutex::new(Vec::new()),
        })
    }

    fn fail(&self) -> Result<(), ClientError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                status: 503,
                message: "service unavailable".to_owned(),
            });
        }
        Ok(())
    }

    fn views(rows: Vec<Subscription>) -> Vec<SubscriptionView> {
        rows.into_iter().map(SubscriptionView::from).collect()
    }
}

#[async_trait]
impl SubscriptionApi for FakeApi {
    async fn get_all(&self) -> Result<Vec<SubscriptionView>, ClientError> {
        self.fail()?;
        Ok(Self::views(self.store.find_all().await?))
    }

    async fn get_active(&self) -> Result<Vec<SubscriptionView>, ClientError> {
        self.fail()?;
        Ok(Self::views(self.store.find_active().await?))
    }

    async fn get(&self, id: i64) -> Result<SubscriptionView, ClientError> {
        self.fail()?;
        self.store
            .find_by_id(id)
            .await?
            .map(SubscriptionView::from)
            .ok_or(ClientError::NotFound(id))
    }

    async fn search(&self, name: &str) -> Result<Vec<SubscriptionView>, ClientError> {
        self.fail()?;
        self.searches.lock().unwrap().push(name.to_owned());
        Ok(Self::views(self.store.find_by_name_containing(name).await?))
    }

    async fn by_frequency(
        &self,
        frequency: Frequency,
    ) -> Result<Vec<SubscriptionView>, ClientError> {
        self.fail()?;
        Ok(Self::views(self.store.find_by_frequency(frequency).await?))
    }

    async fn totals(&self) -> Result<SubscriptionTotals, ClientError> {
        self.fail()?;
        let rows = self.store.find_all().await?;
        Ok(SubscriptionTotals::from_subscriptions(&rows))
    }

    async fn create(
        &self,
        request: &CreateSubscriptionRequest,
    ) -> Result<SubscriptionView, ClientError> {
        self.fail()?;
        let stored = self
            .store
            .insert(NewSubscription {
                name: request.name.clone().unwrap_or_default(),
                description: request.description.clone(),
                amount: request.amount.unwrap_or_default(),
                frequency: request
                    .frequency
                    .as_deref()
                    .unwrap_or("MONTHLY")
                    .parse()
                    .map_err(ClientError::Resolve)?,
                start_date: fixed_now(),
                active: request.is_active.unwrap_or(true),
                created_at: fixed_now(),
            })
            .await?;
        Ok(stored.into())
    }

    async fn update(
        &self,
        id: i64,
        request: &UpdateSubscriptionRequest,
    ) -> Result<SubscriptionView, ClientError> {
        self.fail()?;
        let existing = self.store.find_by_id(id).await?.ok_or(ClientError::NotFound(id))?;
        let updated = Subscription {
            name: request.name.clone().unwrap_or(existing.name.clone()),
            amount: request.amount.unwrap_or(existing.amount),
            ..existing
        };
        self.store.upsert(&updated).await?;
        Ok(updated.into())
    }

    async fn toggle_active(&self, id: i64) -> Result<SubscriptionView, ClientError> {
        self.fail()?;
        let toggled = self.store.toggle_active(id).await?.ok_or(ClientError::NotFound(id))?;
        let delay = self.toggle_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(toggled.into())
    }

    async fn delete(&self, id: i64) -> Result<(), ClientError> {
        self.fail()?;
        if self.store.delete(id).await? {
            Ok(())
        } else {
            Err(ClientError::NotFound(id))
        }
    }
}

fn seeded() -> Arc<FakeApi> {
    FakeApi::with_rows([
        sample_subscription(1, "Netflix", Decimal::new(1000, 2), Frequency::Monthly),
        sample_subscription(2, "Spotify", Decimal::new(12000, 2), Frequency::Yearly),
    ])
}

#[tokio::test]
async fn test_load_fills_list_and_totals() {
    // Arrange
    let holder = SubscriptionStateHolder::new(seeded());

    // Act
    holder.load_subscriptions().await;

    // Assert
    assert_eq!(holder.subscriptions().get().len(), 2);
    assert_eq!(holder.totals().get().monthly_total, Decimal::new(2000, 2));
    assert_eq!(holder.totals().get().yearly_total, Decimal::new(24000, 2));
    assert!(!holder.is_loading().get());
    assert_eq!(holder.error().get(), None);
}

#[tokio::test]
async fn test_loading_flag_rises_and_falls_around_each_call() {
    // Arrange
    let holder = SubscriptionStateHolder::new(seeded());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    holder
        .is_loading()
        .subscribe(move |loading| sink.lock().unwrap().push(*loading));

    // Act
    holder.toggle_active(1).await;

    // Assert
    assert_eq!(*seen.lock().unwrap(), vec![true, false]);
}

#[tokio::test]
async fn test_create_appends_and_refreshes_totals() {
    // Arrange
    let holder = SubscriptionStateHolder::new(seeded());
    holder.load_subscriptions().await;
    let request = CreateSubscriptionRequest::new("Hulu", Decimal::new(500, 2), Frequency::Monthly);

    // Act
    let created = holder.create(&request).await;

    // Assert
    assert!(created);
    let rows = holder.subscriptions().get();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2].name, "Hulu");
    assert_eq!(holder.totals().get().monthly_total, Decimal::new(2500, 2));
}

#[tokio::test]
async fn test_toggle_replaces_entry_in_place() {
    // Arrange
    let holder = SubscriptionStateHolder::new(seeded());
    holder.load_subscriptions().await;

    // Act
    holder.toggle_active(1).await;

    // Assert
    let rows = holder.subscriptions().get();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, 1);
    assert!(!rows[0].active);
    assert_eq!(holder.totals().get().monthly_total, Decimal::new(1000, 2));
}

#[tokio::test]
async fn test_update_replaces_entry_and_delete_removes_it() {
    // Arrange
    let holder = SubscriptionStateHolder::new(seeded());
    holder.load_subscriptions().await;
    let mut request = UpdateSubscriptionRequest::from(&holder.subscriptions().get()[0]);
    request.amount = Some(Decimal::new(1500, 2));

    // Act
    let updated = holder.update(1, &request).await;
    let deleted = holder.delete(2).await;

    // Assert
    assert!(updated && deleted);
    let rows = holder.subscriptions().get();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, Decimal::new(1500, 2));
    assert_eq!(holder.totals().get().monthly_total, Decimal::new(1500, 2));
}

#[tokio::test]
async fn test_failure_sets_message_and_success_clears_it() {
    // Arrange
    let api = seeded();
    let holder = SubscriptionStateHolder::new(api.clone());
    api.failing.store(true, Ordering::SeqCst);

    // Act
    let created = holder
        .create(&CreateSubscriptionRequest::new("Hulu", Decimal::ONE, Frequency::Monthly))
        .await;

    // Assert
    assert!(!created);
    let message = holder.error().get().unwrap();
    assert!(message.starts_with("Failed to create subscription:"), "{message}");
    assert!(!holder.is_loading().get());
    assert!(holder.subscriptions().get().is_empty());

    api.failing.store(false, Ordering::SeqCst);
    holder.load_subscriptions().await;
    assert_eq!(holder.error().get(), None);
}

#[tokio::test]
async fn test_clear_error_empties_the_slot() {
    // Arrange
    let holder = SubscriptionStateHolder::new(seeded());
    holder.delete(99).await;
    assert!(holder.error().get().is_some());

    // Act
    holder.clear_error();

    // Assert
    assert_eq!(holder.error().get(), None);
}

#[tokio::test]
async fn test_blank_search_loads_everything_without_searching() {
    // Arrange
    let api = seeded();
    let holder = SubscriptionStateHolder::new(api.clone());

    // Act
    holder.search("   ").await;

    // Assert
    assert_eq!(holder.subscriptions().get().len(), 2);
    assert!(api.searches.lock().unwrap().is_empty());

    holder.search("NET").await;
    let rows = holder.subscriptions().get();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Netflix");
}

#[tokio::test]
async fn test_active_and_frequency_filters_replace_the_list() {
    // Arrange
    let holder = SubscriptionStateHolder::new(seeded());
    holder.toggle_active(2).await;

    // Act
    holder.load_active_subscriptions().await;
    let active = holder.subscriptions().get();
    holder.load_by_frequency(Frequency::Yearly).await;
    let yearly = holder.subscriptions().get();

    // Assert
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "Netflix");
    assert_eq!(yearly.len(), 1);
    assert_eq!(yearly[0].name, "Spotify");
}

#[tokio::test]
async fn test_rapid_toggles_are_applied_in_call_order() {
    // Arrange: the first toggle's response is slow, the second is instant.
    let api = seeded();
    api.toggle_delays
        .lock()
        .unwrap()
        .extend([Duration::from_millis(50), Duration::ZERO]);
    let holder = SubscriptionStateHolder::new(api.clone());
    holder.load_subscriptions().await;

    // Act
    tokio::join!(holder.toggle_active(1), holder.toggle_active(1));

    // Assert: the list agrees with the server after both flips.
    let server = api.store.find_by_id(1).await.unwrap().unwrap();
    assert!(server.active);
    assert_eq!(holder.subscriptions().get()[0].active, server.active);
}
