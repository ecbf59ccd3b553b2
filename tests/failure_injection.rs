//! Failure injection tests for the upstream path.

use std::time::{Duration, Instant};

use axum::http::StatusCode;
use serde_json::json;
use transit_proxy::http::ErrorBody;
use transit_proxy::upstream::{UpstreamClient, UpstreamError};

mod common;

use common::MockUpstream;

#[tokio::test]
async fn test_connection_refused_is_bad_gateway() {
    let dead = common::refused_addr().await;
    let base = format!("http://{}", dead);
    let proxy = common::spawn_proxy(common::config_for(&base, &base)).await;

    let start = Instant::now();
    let resp = common::http_client()
        .get(proxy.url("/stops?orgId=2&routeId=r1"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: ErrorBody = resp.json().await.unwrap();
    assert!(body.detail.contains("transport"), "{}", body.detail);
    assert!(start.elapsed() < Duration::from_secs(3));

    proxy.stop().await;
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let slow = MockUpstream::start_with_delay(Duration::from_secs(5), |_| {
        (200, json!([]).to_string())
    })
    .await;
    let mut config = common::config_for(&slow.url(), &slow.url());
    config.upstream.connect_timeout_secs = 0.25;
    config.upstream.timeout_secs = 0.5;
    let proxy = common::spawn_proxy(config).await;

    let start = Instant::now();
    let resp = common::http_client()
        .get(proxy.url("/routes-data?orgId=2"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: ErrorBody = resp.json().await.unwrap();
    assert!(body.detail.contains("timed out"), "{}", body.detail);
    assert!(start.elapsed() < Duration::from_secs(3));
    assert_eq!(slow.calls(), 1);

    proxy.stop().await;
}

#[tokio::test]
async fn test_closed_client_is_service_unavailable() {
    let upstream = MockUpstream::start(|_| (200, json!([]).to_string())).await;
    let proxy = common::spawn_proxy(common::config_for(&upstream.url(), &upstream.url())).await;

    proxy.client.shutdown();

    let resp = common::http_client()
        .get(proxy.url("/orgs-data"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(upstream.calls(), 0);

    proxy.stop().await;
}

#[tokio::test]
async fn test_failed_detail_page_returns_nothing_partial() {
    let upstream = MockUpstream::start(|req| match req.path.as_str() {
        "/meta" => (200, json!({ "routeId": "r1" }).to_string()),
        _ => (500, "down".to_string()),
    })
    .await;
    let proxy = common::spawn_proxy(common::config_for(&upstream.url(), &upstream.url())).await;

    let resp = common::http_client()
        .get(proxy.url("/2/r1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let text = resp.text().await.unwrap();
    assert!(!text.contains("<html"), "{}", text);

    proxy.stop().await;
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let upstream = MockUpstream::start(|req| {
        let route = req.param("routeId").unwrap_or_default().to_string();
        (200, json!({ "routeId": route }).to_string())
    })
    .await;
    let proxy = common::spawn_proxy(common::config_for(&upstream.url(), &upstream.url())).await;
    let client = common::http_client();

    let mut handles = Vec::new();
    for i in 0..20 {
        let client = client.clone();
        let url = proxy.url(&format!("/meta?orgId=2&routeId=r{}", i));
        handles.push(tokio::spawn(async move {
            let body: serde_json::Value = client.get(url).send().await.unwrap().json().await.unwrap();
            (i, body)
        }));
    }

    for handle in handles {
        let (i, body) = handle.await.unwrap();
        assert_eq!(body["routeId"], format!("r{}", i));
    }
    assert_eq!(upstream.calls(), 20);

    proxy.stop().await;
}

#[tokio::test]
async fn test_gateway_client_status_mapping() {
    let upstream = MockUpstream::start(|req| match req.path.as_str() {
        "/ok" => (200, "[1, 2]".to_string()),
        "/missing" => (404, "{}".to_string()),
        _ => (500, "down".to_string()),
    })
    .await;
    let config = common::config_for(&upstream.url(), &upstream.url());
    let client = UpstreamClient::new(&config.upstream).unwrap();

    let value = client
        .fetch_json(&format!("{}/ok", upstream.url()), &[("orgId", "2")])
        .await
        .unwrap();
    assert_eq!(value, json!([1, 2]));
    assert_eq!(upstream.last_request().unwrap().param("orgId"), Some("2"));

    let err = client
        .fetch_json(&format!("{}/missing", upstream.url()), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, UpstreamError::NotFound { .. }));

    let err = client
        .fetch_json(&format!("{}/broken", upstream.url()), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, UpstreamError::Status { status: 500, .. }));

    client.shutdown();
}
