//! Integration tests for `PgSubscriptionRepository`.
//!
//! These need a PostgreSQL server reachable through `DATABASE_URL`; run them
//! with `cargo test -- --ignored`.

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use subtrack_core::frequency::Frequency;
use subtrack_core::repository::SubscriptionRepository;
use subtrack_core::subscription::{NewSubscription, Subscription};
use subtrack_store::PgSubscriptionRepository;

/// Helper to build a `NewSubscription` with sensible defaults.
fn new_subscription(name: &str, amount: Decimal, frequency: Frequency) -> NewSubscription {
    let at = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
    NewSubscription {
        name: name.to_owned(),
        description: Some("test".to_owned()),
        amount,
        frequency,
        start_date: at,
        active: true,
        created_at: at,
    }
}

// --- insert ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_insert_assigns_id_and_round_trips_fields(pool: PgPool) {
    let repo = PgSubscriptionRepository::new(pool);

    let stored = repo
        .insert(new_subscription("Netflix", Decimal::new(1599, 2), Frequency::Monthly))
        .await
        .unwrap();

    assert!(stored.id > 0);
    let loaded = repo.find_by_id(stored.id).await.unwrap().unwrap();
    assert_eq!(loaded, stored);
    assert_eq!(loaded.amount, Decimal::new(1599, 2));
    assert_eq!(loaded.next_billing_date, None);
}

// --- upsert ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_upsert_keeps_explicit_id_and_replays_idempotently(pool: PgPool) {
    let repo = PgSubscriptionRepository::new(pool);
    let row: Subscription =
        new_subscription("Spotify", Decimal::new(999, 2), Frequency::Monthly).with_id(77);

    repo.upsert(&row).await.unwrap();
    repo.upsert(&row).await.unwrap();

    assert_eq!(repo.count().await.unwrap(), 1);
    assert_eq!(repo.find_by_id(77).await.unwrap().unwrap(), row);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_upsert_replaces_existing_fields(pool: PgPool) {
    let repo = PgSubscriptionRepository::new(pool);
    let original = new_subscription("Spotify", Decimal::new(999, 2), Frequency::Monthly).with_id(5);
    repo.upsert(&original).await.unwrap();

    let replacement = Subscription {
        amount: Decimal::new(1199, 2),
        ..original
    };
    repo.upsert(&replacement).await.unwrap();

    let loaded = repo.find_by_id(5).await.unwrap().unwrap();
    assert_eq!(loaded.amount, Decimal::new(1199, 2));
}

// --- derived queries ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_search_is_case_insensitive_substring(pool: PgPool) {
    let repo = PgSubscriptionRepository::new(pool);
    repo.insert(new_subscription("Netflix", Decimal::ONE, Frequency::Monthly))
        .await
        .unwrap();
    repo.insert(new_subscription("Spotify", Decimal::ONE, Frequency::Monthly))
        .await
        .unwrap();

    let found = repo.find_by_name_containing("NET").await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Netflix");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_find_by_frequency_and_active(pool: PgPool) {
    let repo = PgSubscriptionRepository::new(pool);
    let monthly = repo
        .insert(new_subscription("Netflix", Decimal::ONE, Frequency::Monthly))
        .await
        .unwrap();
    repo.insert(new_subscription("Prime", Decimal::from(119), Frequency::Yearly))
        .await
        .unwrap();
    repo.toggle_active(monthly.id).await.unwrap();

    let yearly = repo.find_by_frequency(Frequency::Yearly).await.unwrap();
    let active = repo.find_active().await.unwrap();

    assert_eq!(yearly.len(), 1);
    assert_eq!(yearly[0].name, "Prime");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "Prime");
}

// --- toggle / delete ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_toggle_active_flips_and_reports_missing(pool: PgPool) {
    let repo = PgSubscriptionRepository::new(pool);
    let stored = repo
        .insert(new_subscription("Netflix", Decimal::ONE, Frequency::Monthly))
        .await
        .unwrap();

    let toggled = repo.toggle_active(stored.id).await.unwrap().unwrap();
    let toggled_back = repo.toggle_active(stored.id).await.unwrap().unwrap();

    assert!(!toggled.active);
    assert!(toggled_back.active);
    assert!(repo.toggle_active(9_999).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_delete_reports_whether_a_row_was_removed(pool: PgPool) {
    let repo = PgSubscriptionRepository::new(pool);
    let stored = repo
        .insert(new_subscription("Netflix", Decimal::ONE, Frequency::Monthly))
        .await
        .unwrap();

    assert!(repo.delete(stored.id).await.unwrap());
    assert!(!repo.delete(stored.id).await.unwrap());
    assert_eq!(repo.count().await.unwrap(), 0);
}
