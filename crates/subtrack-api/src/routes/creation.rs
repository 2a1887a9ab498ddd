//! Routes of the Creation Service.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use subtrack_core::command::Command;
use subtrack_core::request::CreateSubscriptionRequest;
use subtrack_core::subscription::SubscriptionView;
use subtrack_creation::application::{command_handlers, query_handlers};
use tracing::{info, instrument};

use crate::creation_client::create_command;
use crate::error::ApiError;
use crate::routes::AppJson;
use crate::state::CreationState;

/// GET /
#[instrument(skip(state))]
async fn list_subscriptions(
    State(state): State<CreationState>,
) -> Result<Json<Vec<SubscriptionView>>, ApiError> {
    let subscriptions = query_handlers::list_subscriptions(&*state.repository).await?;
    Ok(Json(subscriptions))
}

/// POST /
#[instrument(skip(state, request), fields(name = request.name.as_deref().unwrap_or_default()))]
async fn create_subscription(
    State(state): State<CreationState>,
    AppJson(request): AppJson<CreateSubscriptionRequest>,
) -> Result<Json<SubscriptionView>, ApiError> {
    let command = create_command(&request);

    info!(correlation_id = %command.correlation_id(), "handling create_subscription command");

    let created = command_handlers::handle_create_subscription(
        &command,
        state.clock.as_ref(),
        &*state.repository,
        Arc::clone(&state.publisher),
    )
    .await?;

    Ok(Json(SubscriptionView::from(created.subscription)))
}

/// Returns the router for the Creation Service.
pub fn router() -> Router<CreationState> {
    Router::new().route("/", get(list_subscriptions).post(create_subscription))
}
