//! One-shot jobs the Creation Service can run before it starts serving.

use chrono::Duration;
use rust_decimal::Decimal;
use subtrack_core::clock::Clock;
use subtrack_core::error::DomainError;
use subtrack_core::event::SubscriptionCreatedEvent;
use subtrack_core::frequency::Frequency;
use subtrack_core::publisher::EventPublisher;
use subtrack_core::repository::SubscriptionRepository;
use subtrack_core::subscription::NewSubscription;
use tracing::{info, warn};

struct DemoRow {
    name: &'static str,
    description: &'static str,
    cents: i64,
    frequency: Frequency,
    started_days_ago: i64,
    active: bool,
}

const DEMO_ROWS: [DemoRow; 4] = [
    DemoRow {
        name: "Netflix",
        description: "Streaming Service",
        cents: 1599,
        frequency: Frequency::Monthly,
        started_days_ago: 30,
        active: true,
    },
    DemoRow {
        name: "Spotify",
        description: "Music Streaming",
        cents: 999,
        frequency: Frequency::Monthly,
        started_days_ago: 60,
        active: true,
    },
    DemoRow {
        name: "Amazon Prime",
        description: "Shopping + Video",
        cents: 11900,
        frequency: Frequency::Yearly,
        started_days_ago: 365,
        active: true,
    },
    DemoRow {
        name: "Adobe Creative Cloud",
        description: "Design Tools",
        cents: 5299,
        frequency: Frequency::Monthly,
        started_days_ago: 90,
        active: false,
    },
];

/// Inserts the demo subscriptions when the store is empty. Seeded rows are
/// not published; pair with [`republish_existing`] to reach the replica.
///
/// Returns how many rows were inserted.
///
/// # Errors
///
/// Returns `DomainError::Unavailable` if the store cannot be read or written.
pub async fn seed_demo_subscriptions(
    clock: &dyn Clock,
    repo: &dyn SubscriptionRepository,
) -> Result<usize, DomainError> {
    if repo.count().await? > 0 {
        info!("store already contains data, skipping demo seed");
        return Ok(0);
    }

    let now = clock.now();
    for row in &DEMO_ROWS {
        repo.insert(NewSubscription {
            name: row.name.to_owned(),
            description: Some(row.description.to_owned()),
            amount: Decimal::new(row.cents, 2),
            frequency: row.frequency,
            start_date: now - Duration::days(row.started_days_ago),
            active: row.active,
            created_at: now,
        })
        .await?;
    }
    info!(rows = DEMO_ROWS.len(), "demo subscriptions seeded");
    Ok(DEMO_ROWS.len())
}

/// Tally of a startup republish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepublishReport {
    /// Events the publisher accepted.
    pub published: usize,
    /// Events the publisher rejected.
    pub failed: usize,
}

/// Publishes a creation event for every row in the store, in id order.
///
/// Publish failures are logged and counted; they never abort the sweep.
/// Replaying an event into the replica overwrites any update made there
/// since the original creation.
///
/// # Errors
///
/// Returns `DomainError::Unavailable` only if the store cannot be read.
pub async fn republish_existing(
    clock: &dyn Clock,
    repo: &dyn SubscriptionRepository,
    publisher: &dyn EventPublisher,
) -> Result<RepublishReport, DomainError> {
    let mut report = RepublishReport::default();
    for subscription in repo.find_all().await? {
        let event = SubscriptionCreatedEvent::from_subscription(&subscription, clock.now());
        match publisher.publish(&event).await {
            Ok(()) => report.published += 1,
            Err(e) => {
                warn!(subscription_id = subscription.id, error = %e, "republish failed");
                report.failed += 1;
            }
        }
    }
    info!(
        published = report.published,
        failed = report.failed,
        "startup republish finished"
    );
    Ok(report)
}
