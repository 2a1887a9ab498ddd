//! Reactive state holder for the subscription screens.
//!
//! Four observable slots mirror what the server last told us. Every action
//! raises `is_loading`, clears `error`, calls the API, folds the result into
//! the slots, records a failure as a readable message, and drops
//! `is_loading` again. Mutations are serialized, so two quick toggles of the
//! same row apply one after the other.

use std::future::Future;
use std::sync::Arc;

use subtrack_core::frequency::Frequency;
use subtrack_core::request::{CreateSubscriptionRequest, UpdateSubscriptionRequest};
use subtrack_core::subscription::SubscriptionView;
use subtrack_core::totals::SubscriptionTotals;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::api::SubscriptionApi;
use crate::error::ClientError;
use crate::observable::Observable;

/// Client-side view of the subscription list and totals.
pub struct SubscriptionStateHolder {
    api: Arc<dyn SubscriptionApi>,
    subscriptions: Observable<Vec<SubscriptionView>>,
    totals: Observable<SubscriptionTotals>,
    is_loading: Observable<bool>,
    error: Observable<Option<String>>,
    mutations: Mutex<()>,
}

impl std::fmt::Debug for SubscriptionStateHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionStateHolder")
            .field("subscriptions", &self.subscriptions)
            .field("totals", &self.totals)
            .field("is_loading", &self.is_loading)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl SubscriptionStateHolder {
    /// Creates a holder with empty slots.
    #[must_use]
    pub fn new(api: Arc<dyn SubscriptionApi>) -> Self {
        Self {
            api,
            subscriptions: Observable::default(),
            totals: Observable::default(),
            is_loading: Observable::new(false),
            error: Observable::new(None),
            mutations: Mutex::new(()),
        }
    }

    /// The subscriptions currently shown.
    #[must_use]
    pub fn subscriptions(&self) -> &Observable<Vec<SubscriptionView>> {
        &self.subscriptions
    }

    /// Monthly and yearly totals of active subscriptions.
    #[must_use]
    pub fn totals(&self) -> &Observable<SubscriptionTotals> {
        &self.totals
    }

    /// Whether a remote call is in flight.
    #[must_use]
    pub fn is_loading(&self) -> &Observable<bool> {
        &self.is_loading
    }

    /// The most recent failure, if any.
    #[must_use]
    pub fn error(&self) -> &Observable<Option<String>> {
        &self.error
    }

    /// Clears the error slot.
    pub fn clear_error(&self) {
        self.error.set(None);
    }

    /// Runs `call` inside the loading/error envelope. Returns the value on
    /// success; on failure stores `"Failed to {action}: {error}"`.
    async fn track<T, F>(&self, action: &str, call: F) -> Option<T>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        self.is_loading.set(true);
        self.error.set(None);
        let outcome = match call.await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(action, error = %e, "subscription call failed");
                self.error.set(Some(format!("Failed to {action}: {e}")));
                None
            }
        };
        self.is_loading.set(false);
        outcome
    }

    /// Refreshes the totals slot. A failure is recorded in `error` and
    /// leaves the previous totals in place.
    pub async fn load_totals(&self) {
        match self.api.totals().await {
            Ok(totals) => self.totals.set(totals),
            Err(e) => {
                warn!(error = %e, "totals refresh failed");
                self.error.set(Some(format!("Failed to load totals: {e}")));
            }
        }
    }

    /// Replaces the list with every subscription and refreshes totals.
    pub async fn load_subscriptions(&self) {
        let loaded = self
            .track("load subscriptions", async {
                let all = self.api.get_all().await?;
                self.subscriptions.set(all);
                self.load_totals().await;
                Ok(())
            })
            .await;
        if loaded.is_some() {
            info!(count = self.subscriptions.get().len(), "subscriptions loaded");
        }
    }

    /// Replaces the list with the active subscriptions.
    pub async fn load_active_subscriptions(&self) {
        if let Some(active) = self
            .track("load active subscriptions", self.api.get_active())
            .await
        {
            self.subscriptions.set(active);
        }
    }

    /// Replaces the list with subscriptions billed at `frequency`.
    pub async fn load_by_frequency(&self, frequency: Frequency) {
        if let Some(rows) = self
            .track("filter subscriptions", self.api.by_frequency(frequency))
            .await
        {
            self.subscriptions.set(rows);
        }
    }

    /// Replaces the list with name matches for `query`. A blank query loads
    /// the full list instead.
    pub async fn search(&self, query: &str) {
        if query.trim().is_empty() {
            self.load_subscriptions().await;
            return;
        }
        if let Some(found) = self
            .track("search subscriptions", self.api.search(query))
            .await
        {
            self.subscriptions.set(found);
        }
    }

    /// Creates a subscription and appends it to the list.
    pub async fn create(&self, request: &CreateSubscriptionRequest) -> bool {
        let _serial = self.mutations.lock().await;
        let Some(created) = self
            .track("create subscription", self.api.create(request))
            .await
        else {
            return false;
        };
        self.subscriptions.update(|rows| rows.push(created));
        self.load_totals().await;
        true
    }

    /// Updates a subscription and replaces the matching list entry.
    pub async fn update(&self, id: i64, request: &UpdateSubscriptionRequest) -> bool {
        let _serial = self.mutations.lock().await;
        let Some(updated) = self
            .track("update subscription", self.api.update(id, request))
            .await
        else {
            return false;
        };
        self.replace(updated);
        self.load_totals().await;
        true
    }

    /// Flips a subscription's active flag and replaces the matching entry.
    pub async fn toggle_active(&self, id: i64) -> bool {
        let _serial = self.mutations.lock().await;
        let Some(toggled) = self
            .track("toggle subscription", self.api.toggle_active(id))
            .await
        else {
            return false;
        };
        self.replace(toggled);
        self.load_totals().await;
        true
    }

    /// Deletes a subscription and removes it from the list.
    pub async fn delete(&self, id: i64) -> bool {
        let _serial = self.mutations.lock().await;
        if self
            .track("delete subscription", self.api.delete(id))
            .await
            .is_none()
        {
            return false;
        }
        self.subscriptions.update(|rows| rows.retain(|s| s.id != id));
        self.load_totals().await;
        true
    }

    fn replace(&self, fresh: SubscriptionView) {
        self.subscriptions.update(|rows| {
            for row in rows.iter_mut().filter(|row| row.id == fresh.id) {
                *row = fresh.clone();
            }
        });
    }
}
