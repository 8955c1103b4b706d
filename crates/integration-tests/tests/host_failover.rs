//! Integration tests for the multi-host retry policy.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use thrift_client::{ApiClient, ApiError, ClientConfig, MemoryStore, RequestOptions};
use thrift_core::ProductFilters;
use thrift_integration_tests::{client, init_tracing, product_json, unreachable_host};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn slow_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_three_timed_out_hosts_name_method_and_path_only() {
    init_tracing();
    let servers = [slow_server().await, slow_server().await, slow_server().await];
    let hosts: Vec<String> = servers.iter().map(MockServer::uri).collect();

    let config = ClientConfig::new(&hosts[0])
        .unwrap()
        .with_fallback_hosts(&hosts[1..])
        .unwrap()
        .with_retry_count(0)
        .with_backoff(Duration::ZERO)
        .with_request_timeout(Duration::from_millis(50));
    let client = ApiClient::new(config, Arc::new(MemoryStore::new())).unwrap();

    let err = client
        .request("/products?category=musik", RequestOptions::get())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::NetworkExhausted { attempts: 3, .. }));
    let message = err.to_string();
    assert!(message.contains("GET /products?category=musik"));
    for host in &hosts {
        let authority = host.trim_start_matches("http://");
        assert!(!message.contains(authority), "message leaks {authority}: {message}");
    }
}

#[tokio::test]
async fn test_unreachable_primary_falls_over_to_later_host() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([product_json(5, "Rok Plisket")])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(
        &[unreachable_host(), unreachable_host(), server.uri()],
        Arc::new(MemoryStore::new()),
    );
    let products = client.products(&ProductFilters::default()).await.unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Rok Plisket");
}

#[tokio::test]
async fn test_each_host_is_tried_once_per_round() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    for server in [&first, &second] {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .expect(2)
            .mount(server)
            .await;
    }

    // retry_count 1 means two rounds over both hosts
    let client = client(&[first.uri(), second.uri()], Arc::new(MemoryStore::new()));
    let err = client
        .request("/faq", RequestOptions::get())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApiError::NetworkExhausted {
            attempts: 4,
            last_status: Some(502),
            ..
        }
    ));
}
