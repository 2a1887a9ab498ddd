//! PostgreSQL-backed subscription store.
//!
//! The same schema backs both the creation-owned store and the
//! query-owned replica; only the way rows arrive differs.

pub mod models;
pub mod pg_subscription_repository;
pub mod schema;

pub use pg_subscription_repository::PgSubscriptionRepository;
