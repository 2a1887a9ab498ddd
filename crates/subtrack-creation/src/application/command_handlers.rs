//! Command handlers for the Creation Service.
//!
//! Creation is a local insert followed by a best-effort publish. The publish
//! runs on its own task so the caller gets the stored row back before the
//! broker acknowledges anything; a failed publish is logged and the insert
//! stands.

use std::sync::Arc;

use subtrack_core::clock::Clock;
use subtrack_core::command::Command;
use subtrack_core::error::DomainError;
use subtrack_core::event::SubscriptionCreatedEvent;
use subtrack_core::publisher::EventPublisher;
use subtrack_core::repository::SubscriptionRepository;
use subtrack_core::subscription::{NewSubscription, Subscription};
use subtrack_core::validation::{UncheckedFields, validate};
use tokio::task::JoinHandle;
use tracing::{Instrument, error, info, info_span};

use crate::domain::commands::CreateSubscription;

/// Outcome of a successful creation.
#[derive(Debug)]
pub struct CreatedSubscription {
    /// The row as stored, with its assigned id.
    pub subscription: Subscription,
    /// The detached publish task. Callers may drop it; tests await it.
    pub publish: JoinHandle<()>,
}

/// Handles the `CreateSubscription` command: validates the fields, inserts
/// the row, and spawns publication of the creation event.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the name, amount, or frequency is
/// invalid; nothing is stored or published in that case.
/// Returns `DomainError::Unavailable` if the store rejects the insert.
pub async fn handle_create_subscription(
    command: &CreateSubscription,
    clock: &dyn Clock,
    repo: &dyn SubscriptionRepository,
    publisher: Arc<dyn EventPublisher>,
) -> Result<CreatedSubscription, DomainError> {
    let valid = validate(&UncheckedFields {
        name: command.name.as_deref(),
        amount: command.amount,
        frequency: command.frequency.as_deref(),
    })?;

    let now = clock.now();
    let subscription = repo
        .insert(NewSubscription {
            name: valid.name,
            description: command.description.clone(),
            amount: valid.amount,
            frequency: valid.frequency,
            start_date: command.start_date.unwrap_or(now),
            active: command.active,
            created_at: now,
        })
        .await?;

    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        subscription_id = subscription.id,
        "subscription stored"
    );

    let event = SubscriptionCreatedEvent::from_subscription(&subscription, clock.now());
    let publish = spawn_publish(publisher, event);

    Ok(CreatedSubscription {
        subscription,
        publish,
    })
}

fn spawn_publish(publisher: Arc<dyn EventPublisher>, event: SubscriptionCreatedEvent) -> JoinHandle<()> {
    let span = info_span!("publish_created_event", subscription_id = event.subscription_id);
    tokio::spawn(
        async move {
            match publisher.publish(&event).await {
                Ok(()) => info!("creation event published"),
                Err(e) => error!(
                    error = %e,
                    "creation event not published, replica will not receive this subscription"
                ),
            }
        }
        .instrument(span),
    )
}
