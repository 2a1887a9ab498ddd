//! Subscription store database schema.
//!
//! The DDL lives in the workspace `migrations/` directory and is embedded at
//! compile time. The `id` column is an identity generated *by default*, so
//! the creation store lets PostgreSQL assign ids while the replica inserts
//! the source id explicitly.

use sqlx::PgPool;
use sqlx::migrate::{MigrateError, Migrator};

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Applies any pending migrations.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the history is inconsistent.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

/// Columns selected by every read, in `SubscriptionRow` order.
pub(crate) const SUBSCRIPTION_COLUMNS: &str =
    "id, name, description, amount, frequency, start_date, next_billing_date, active, created_at";
