//! Command abstractions.

use uuid::Uuid;

/// Trait that all commands implement.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// The type name for this command (for logging/routing).
    fn command_type(&self) -> &'static str;

    /// Correlation ID to trace this command through the system.
    fn correlation_id(&self) -> Uuid;

    /// The subscription this command targets, when it targets an existing one.
    fn subscription_id(&self) -> Option<i64> {
        None
    }
}

/// Returns a fresh, time-ordered correlation id for a command entering the
/// system at an HTTP boundary.
#[must_use]
pub fn new_correlation_id() -> Uuid {
    Uuid::now_v7()
}
