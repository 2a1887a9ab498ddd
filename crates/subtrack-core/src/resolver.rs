//! Service discovery seam: resolves a logical service name to a base URL.

use std::collections::HashMap;

use crate::error::DomainError;

/// Logical name of the creation service.
pub const CREATION_SERVICE: &str = "create-subscription-service";

/// Logical name of the read/query service.
pub const QUERY_SERVICE: &str = "main-service";

/// Resolves the runtime address of a named service.
pub trait ServiceResolver: Send + Sync {
    /// Returns the base URL (no trailing slash) for `service`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unavailable` when the service is unknown.
    fn resolve(&self, service: &str) -> Result<String, DomainError>;
}

/// Resolver backed by a fixed name-to-URL table.
#[derive(Debug, Clone, Default)]
pub struct StaticServiceResolver {
    routes: HashMap<String, String>,
}

impl StaticServiceResolver {
    /// Creates an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `base_url` for `service`, replacing any previous entry.
    #[must_use]
    pub fn with_service(mut self, service: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        self.routes.insert(service.into(), base_url);
        self
    }
}

impl ServiceResolver for StaticServiceResolver {
    fn resolve(&self, service: &str) -> Result<String, DomainError> {
        self.routes
            .get(service)
            .cloned()
            .ok_or_else(|| DomainError::Unavailable(format!("no address known for {service}")))
    }
}
