//! Integration tests for reads that must succeed without a backend.
//!
//! Every resource with a local fallback returns the last cached value, or
//! its built-in default if nothing was ever cached.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use thrift_client::{MemoryStore, default_faqs, default_stores};
use thrift_core::{LocaleSettings, NotificationSettings, ProductFilters};
use thrift_integration_tests::{client, log_in, product_json, unreachable_host, user};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn test_server_error_returns_last_cached_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([product_json(31, "Jaket Denim"), product_json(32, "Sepatu Kulit")])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client(&[server.uri()], Arc::new(MemoryStore::new()));

    let online = client.products(&ProductFilters::default()).await.unwrap();
    let offline = client.products(&ProductFilters::default()).await.unwrap();

    assert_eq!(offline, online);
    assert_eq!(offline.len(), 2);
}

#[tokio::test]
async fn test_server_error_without_cache_returns_mock_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client(&[server.uri()], Arc::new(MemoryStore::new()));
    let products = client.products(&ProductFilters::default()).await.unwrap();

    let ids: Vec<i64> = products.iter().map(|p| p.id.as_i64()).collect();
    assert_eq!(ids, vec![1, 2]);
}

// =============================================================================
// Reference Data
// =============================================================================

#[tokio::test]
async fn test_reference_data_without_backend() {
    let client = client(&[unreachable_host()], Arc::new(MemoryStore::new()));

    assert_eq!(client.faqs().await.unwrap(), default_faqs());
    assert_eq!(client.stores().await.unwrap(), default_stores());
}

// =============================================================================
// Settings
// =============================================================================

#[tokio::test]
async fn test_settings_written_offline_are_read_back_offline() {
    let client = client(&[unreachable_host()], Arc::new(MemoryStore::new()));
    log_in(&client, "tok-settings", &user("14", "lia@thrift.id"));

    let locale = LocaleSettings {
        language: "English".to_string(),
        ..LocaleSettings::default()
    };
    let notifications = NotificationSettings {
        new_arrivals: false,
        ..NotificationSettings::default()
    };

    assert!(client.update_user_settings(&locale).await.unwrap().cached);
    assert!(
        client
            .update_notification_settings(&notifications)
            .await
            .unwrap()
            .cached
    );

    assert_eq!(client.user_settings().await.unwrap(), Some(locale));
    assert_eq!(client.notification_settings().await.unwrap(), notifications);
}

#[tokio::test]
async fn test_profile_read_offline_returns_stored_user() {
    let client = client(&[unreachable_host()], Arc::new(MemoryStore::new()));
    let stored = user("14", "lia@thrift.id");
    log_in(&client, "tok-profile", &stored);

    assert_eq!(client.user_profile(None).await.unwrap(), stored);
}
