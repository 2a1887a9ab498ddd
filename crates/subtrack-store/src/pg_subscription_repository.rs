//! `PostgreSQL` implementation of the `SubscriptionRepository` trait.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;

use subtrack_core::error::DomainError;
use subtrack_core::frequency::Frequency;
use subtrack_core::repository::SubscriptionRepository;
use subtrack_core::subscription::{NewSubscription, Subscription};

use crate::models::{SubscriptionRow, into_subscriptions};
use crate::schema::SUBSCRIPTION_COLUMNS;

/// PostgreSQL-backed subscription repository.
#[derive(Debug, Clone)]
pub struct PgSubscriptionRepository {
    pool: PgPool,
}

impl PgSubscriptionRepository {
    /// Creates a new `PgSubscriptionRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Round-trips a trivial query to check the database is reachable.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unavailable` if the query fails.
    pub async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| unavailable("ping", &e))
    }

    async fn fetch_where(
        &self,
        operation: &'static str,
        predicate: &str,
        bind: Option<String>,
    ) -> Result<Vec<Subscription>, DomainError> {
        let sql = format!("SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions {predicate} ORDER BY id");
        let mut query = sqlx::query_as::<_, SubscriptionRow>(&sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| unavailable(operation, &e))?;
        into_subscriptions(rows)
    }
}

/// Logs the driver error and classifies it without leaking details upward.
fn unavailable(operation: &'static str, err: &sqlx::Error) -> DomainError {
    error!(operation, error = %err, "subscription store query failed");
    DomainError::Unavailable(format!("subscription store {operation} failed"))
}

/// Escapes `LIKE` metacharacters so a search fragment matches literally.
fn like_pattern(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len() + 2);
    escaped.push('%');
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn insert(&self, subscription: NewSubscription) -> Result<Subscription, DomainError> {
        let sql = format!(
            "INSERT INTO subscriptions \
                 (name, description, amount, frequency, start_date, active, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {SUBSCRIPTION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SubscriptionRow>(&sql)
            .bind(&subscription.name)
            .bind(&subscription.description)
            .bind(subscription.amount)
            .bind(subscription.frequency.as_str())
            .bind(subscription.start_date)
            .bind(subscription.active)
            .bind(subscription.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| unavailable("insert", &e))?;
        Subscription::try_from(row)
    }

    async fn upsert(&self, subscription: &Subscription) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO subscriptions \
                 (id, name, description, amount, frequency, start_date, next_billing_date, active, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (id) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 description = EXCLUDED.description, \
                 amount = EXCLUDED.amount, \
                 frequency = EXCLUDED.frequency, \
                 start_date = EXCLUDED.start_date, \
                 next_billing_date = EXCLUDED.next_billing_date, \
                 active = EXCLUDED.active, \
                 created_at = EXCLUDED.created_at",
        )
        .bind(subscription.id)
        .bind(&subscription.name)
        .bind(&subscription.description)
        .bind(subscription.amount)
        .bind(subscription.frequency.as_str())
        .bind(subscription.start_date)
        .bind(subscription.next_billing_date)
        .bind(subscription.active)
        .bind(subscription.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| unavailable("upsert", &e))?;
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Subscription>, DomainError> {
        let sql = format!("SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE id = $1");
        let row = sqlx::query_as::<_, SubscriptionRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| unavailable("find_by_id", &e))?;
        row.map(Subscription::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Subscription>, DomainError> {
        self.fetch_where("find_all", "", None).await
    }

    async fn find_active(&self) -> Result<Vec<Subscription>, DomainError> {
        self.fetch_where("find_active", "WHERE active", None).await
    }

    async fn find_by_name_containing(
        &self,
        fragment: &str,
    ) -> Result<Vec<Subscription>, DomainError> {
        self.fetch_where(
            "find_by_name_containing",
            r"WHERE name ILIKE $1 ESCAPE '\'",
            Some(like_pattern(fragment)),
        )
        .await
    }

    async fn find_by_frequency(
        &self,
        frequency: Frequency,
    ) -> Result<Vec<Subscription>, DomainError> {
        self.fetch_where(
            "find_by_frequency",
            "WHERE frequency = $1",
            Some(frequency.as_str().to_owned()),
        )
        .await
    }

    async fn toggle_active(&self, id: i64) -> Result<Option<Subscription>, DomainError> {
        let sql = format!(
            "UPDATE subscriptions SET active = NOT active WHERE id = $1 \
             RETURNING {SUBSCRIPTION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SubscriptionRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| unavailable("toggle_active", &e))?;
        row.map(Subscription::try_from).transpose()
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| unavailable("delete", &e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, DomainError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subscriptions")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| unavailable("count", &e))
    }
}
