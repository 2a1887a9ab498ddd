//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use subtrack_core::clock::Clock;
use subtrack_core::publisher::EventPublisher;
use subtrack_core::repository::SubscriptionRepository;
use subtrack_test_support::{FixedClock, InMemorySubscriptionRepository};
use tower::ServiceExt;

use subtrack_api::app::{creation_app, query_app};
use subtrack_api::creation_client::InProcessCreationClient;
use subtrack_api::state::{CreationState, QueryState};

/// Both services over in-memory stores, sharing one publisher.
pub struct TestServices {
    /// Creation Service router.
    pub creation: Router,
    /// Read/Query Service router.
    pub query: Router,
    /// Creation-owned store.
    pub source: Arc<InMemorySubscriptionRepository>,
    /// Replica store.
    pub replica: Arc<InMemorySubscriptionRepository>,
}

/// Build both routers the way the all-in-one binary does, with a fixed
/// clock and in-memory stores.
pub fn build_services(publisher: Arc<dyn EventPublisher>) -> TestServices {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::default());
    let source = Arc::new(InMemorySubscriptionRepository::new());
    let replica = Arc::new(InMemorySubscriptionRepository::new());
    let source_dyn: Arc<dyn SubscriptionRepository> = source.clone();

    let creation_client = Arc::new(InProcessCreationClient::new(
        Arc::clone(&clock),
        Arc::clone(&source_dyn),
        Arc::clone(&publisher),
    ));

    TestServices {
        creation: creation_app(CreationState::new(clock, source_dyn, publisher)),
        query: query_app(QueryState::new(replica.clone(), creation_client)),
        source,
        replica,
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, json_request("POST", uri, body)).await
}

/// Send a PUT request with a JSON body and return the response.
pub async fn put_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, json_request("PUT", uri, body)).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, empty_request("GET", uri)).await
}

/// Send a PATCH request without a body and return the response.
pub async fn patch(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, empty_request("PATCH", uri)).await
}

/// Send a DELETE request; the body is `Null` when empty.
pub async fn delete(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, empty_request("DELETE", uri)).await
}
