//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No subscription exists with the given id.
    #[error("subscription not found: {0}")]
    SubscriptionNotFound(i64),

    /// Input rejected at the boundary (blank name, non-positive amount,
    /// missing or unrecognized frequency).
    #[error("validation error: {0}")]
    Validation(String),

    /// Persistence or a downstream service could not be reached.
    #[error("upstream unavailable: {0}")]
    Unavailable(String),

    /// An event or payload could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}
