//! Client error types.

use subtrack_core::error::DomainError;

/// Failures of a remote subscription call.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server has no subscription with this id.
    #[error("subscription {0} not found")]
    NotFound(i64),

    /// The server rejected the request or failed, with its own message.
    #[error("server responded {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or the status reason.
        message: String,
    },

    /// The request never produced a response, or the body did not decode.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service address could not be resolved.
    #[error("service lookup failed: {0}")]
    Resolve(#[from] DomainError),
}
