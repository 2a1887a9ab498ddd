//! Routes of the Read/Query Service.
//!
//! Reads and mutations go to the replica. `POST` is forwarded to the
//! Creation Service; the new row reaches the replica only through the
//! event channel.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde::Deserialize;
use subtrack_core::command::{Command, new_correlation_id};
use subtrack_core::request::{CreateSubscriptionRequest, UpdateSubscriptionRequest};
use subtrack_core::subscription::SubscriptionView;
use subtrack_core::totals::SubscriptionTotals;
use subtrack_query::application::{command_handlers, query_handlers};
use subtrack_query::domain::commands;
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::routes::AppJson;
use crate::state::QueryState;

/// Query string of GET /search.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Substring to look for; absent matches everything.
    #[serde(default)]
    pub name: String,
}

/// GET /
#[instrument(skip(state))]
async fn list_subscriptions(
    State(state): State<QueryState>,
) -> Result<Json<Vec<SubscriptionView>>, ApiError> {
    Ok(Json(query_handlers::list_subscriptions(&*state.repository).await?))
}

/// GET /active
#[instrument(skip(state))]
async fn list_active(
    State(state): State<QueryState>,
) -> Result<Json<Vec<SubscriptionView>>, ApiError> {
    Ok(Json(
        query_handlers::list_active_subscriptions(&*state.repository).await?,
    ))
}

/// GET /search?name=
#[instrument(skip(state))]
async fn search(
    State(state): State<QueryState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SubscriptionView>>, ApiError> {
    Ok(Json(
        query_handlers::search_subscriptions(&params.name, &*state.repository).await?,
    ))
}

/// GET /by-frequency/{frequency}
#[instrument(skip(state))]
async fn by_frequency(
    State(state): State<QueryState>,
    Path(frequency): Path<String>,
) -> Result<Json<Vec<SubscriptionView>>, ApiError> {
    Ok(Json(
        query_handlers::list_by_frequency(&frequency, &*state.repository).await?,
    ))
}

/// GET /totals
#[instrument(skip(state))]
async fn totals(State(state): State<QueryState>) -> Result<Json<SubscriptionTotals>, ApiError> {
    Ok(Json(query_handlers::subscription_totals(&*state.repository).await?))
}

/// GET /{id}
#[instrument(skip(state))]
async fn get_subscription(
    State(state): State<QueryState>,
    Path(id): Path<i64>,
) -> Result<Json<SubscriptionView>, ApiError> {
    Ok(Json(query_handlers::get_subscription(id, &*state.repository).await?))
}

/// POST /
#[instrument(skip(state, request))]
async fn create_subscription(
    State(state): State<QueryState>,
    AppJson(request): AppJson<CreateSubscriptionRequest>,
) -> Result<Json<SubscriptionView>, ApiError> {
    info!("forwarding create_subscription to the creation service");
    Ok(Json(state.creation_client.create(&request).await?))
}

/// PUT /{id}
#[instrument(skip(state, request))]
async fn update_subscription(
    State(state): State<QueryState>,
    Path(id): Path<i64>,
    AppJson(request): AppJson<UpdateSubscriptionRequest>,
) -> Result<Json<SubscriptionView>, ApiError> {
    let command = commands::UpdateSubscription {
        correlation_id: new_correlation_id(),
        subscription_id: id,
        name: request.name,
        description: request.description,
        amount: request.amount,
        frequency: request.frequency,
        start_date: request.start_date,
        next_billing_date: request.next_billing_date,
        active: request.active,
    };

    info!(correlation_id = %command.correlation_id(), "handling update_subscription command");

    let updated = command_handlers::handle_update_subscription(&command, &*state.repository).await?;
    Ok(Json(SubscriptionView::from(updated)))
}

/// PATCH /{id}/toggle-active
#[instrument(skip(state))]
async fn toggle_active(
    State(state): State<QueryState>,
    Path(id): Path<i64>,
) -> Result<Json<SubscriptionView>, ApiError> {
    let command = commands::ToggleSubscriptionActive {
        correlation_id: new_correlation_id(),
        subscription_id: id,
    };

    info!(correlation_id = %command.correlation_id(), "handling toggle_subscription_active command");

    let toggled =
        command_handlers::handle_toggle_subscription_active(&command, &*state.repository).await?;
    Ok(Json(SubscriptionView::from(toggled)))
}

/// DELETE /{id}
#[instrument(skip(state))]
async fn delete_subscription(
    State(state): State<QueryState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let command = commands::DeleteSubscription {
        correlation_id: new_correlation_id(),
        subscription_id: id,
    };

    info!(correlation_id = %command.correlation_id(), "handling delete_subscription command");

    command_handlers::handle_delete_subscription(&command, &*state.repository).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for the Read/Query Service.
pub fn router() -> Router<QueryState> {
    Router::new()
        .route("/", get(list_subscriptions).post(create_subscription))
        .route("/active", get(list_active))
        .route("/search", get(search))
        .route("/by-frequency/{frequency}", get(by_frequency))
        .route("/totals", get(totals))
        .route(
            "/{id}",
            get(get_subscription)
                .put(update_subscription)
                .delete(delete_subscription),
        )
        .route("/{id}/toggle-active", patch(toggle_active))
}
