//! Router composition for both services.

use axum::Router;
use subtrack_core::resolver::{CREATION_SERVICE, QUERY_SERVICE};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::routes;
use crate::state::{CreationState, QueryState};

/// Path prefix of the subscription resource on both services.
pub const SUBSCRIPTIONS_PATH: &str = "/api/subscriptions";

/// The Creation Service router.
pub fn creation_app(state: CreationState) -> Router {
    // TODO: Replace CorsLayer::permissive() with the client's origins once it is deployed behind one.
    Router::new()
        .merge(routes::health::router(CREATION_SERVICE))
        .nest(SUBSCRIPTIONS_PATH, routes::creation::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// The Read/Query Service router.
pub fn query_app(state: QueryState) -> Router {
    Router::new()
        .merge(routes::health::router(QUERY_SERVICE))
        .nest(SUBSCRIPTIONS_PATH, routes::query::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
