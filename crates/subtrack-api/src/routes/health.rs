//! Health check endpoint.

use axum::{Json, Router, routing::get};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `UP` while the process serves requests.
    pub status: &'static str,
    /// Logical service name.
    pub service: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Returns the health check router for `service`, usable under any state.
pub fn router<S>(service: &'static str) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(
        "/health",
        get(move || async move {
            Json(HealthResponse {
                status: "UP",
                service,
                version: env!("CARGO_PKG_VERSION"),
            })
        }),
    )
}
