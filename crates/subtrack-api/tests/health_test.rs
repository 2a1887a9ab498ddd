//! Integration tests for the health endpoint.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use subtrack_test_support::RecordingEventPublisher;

#[tokio::test]
async fn test_health_names_each_service() {
    let services = common::build_services(Arc::new(RecordingEventPublisher::new()));

    let (creation_status, creation) = common::get_json(services.creation, "/health").await;
    let (query_status, query) = common::get_json(services.query, "/health").await;

    assert_eq!(creation_status, StatusCode::OK);
    assert_eq!(creation["status"], "UP");
    assert_eq!(creation["service"], "create-subscription-service");
    assert_eq!(query_status, StatusCode::OK);
    assert_eq!(query["service"], "main-service");
    assert!(query["version"].is_string());
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let services = common::build_services(Arc::new(RecordingEventPublisher::new()));

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/v1/nonexistent")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(services.query, request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
