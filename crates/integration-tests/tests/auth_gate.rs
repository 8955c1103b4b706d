//! Integration tests for auth-gated operations.
//!
//! Without a real credential these must fail with `AuthenticationRequired`
//! before any request is sent and without touching local storage.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use thrift_client::{ApiClient, ApiError, KeyValueStore, MemoryStore};
use thrift_core::{
    LocaleSettings, NewSupportTicket, NotificationId, NotificationSettings, ProductId,
    ProductUpdate, UserUpdate,
};
use thrift_integration_tests::client;
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn backend_expecting_no_calls() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    server
}

fn assert_auth_required<T: std::fmt::Debug>(result: Result<T, ApiError>) {
    match result {
        Err(ApiError::AuthenticationRequired) => {}
        other => panic!("expected AuthenticationRequired, got {other:?}"),
    }
}

async fn assert_every_gated_call_fails(client: &ApiClient) {
    assert_auth_required(client.wishlist().await);
    assert_auth_required(client.add_to_wishlist(ProductId::new(42)).await);
    assert_auth_required(client.remove_from_wishlist(ProductId::new(42)).await);
    assert_auth_required(client.user_products(None).await);
    assert_auth_required(
        client
            .update_product(ProductId::new(42), &ProductUpdate::default())
            .await,
    );
    assert_auth_required(client.delete_product(ProductId::new(42)).await);
    assert_auth_required(client.user_profile(None).await);
    assert_auth_required(client.update_user_profile(&UserUpdate::default()).await);
    assert_auth_required(client.user_settings().await);
    assert_auth_required(client.update_user_settings(&LocaleSettings::default()).await);
    assert_auth_required(client.notification_settings().await);
    assert_auth_required(
        client
            .update_notification_settings(&NotificationSettings::default())
            .await,
    );
    assert_auth_required(client.notifications().await);
    assert_auth_required(client.mark_notification_read(&NotificationId::new("n-1")).await);
    assert_auth_required(client.support_tickets().await);
    assert_auth_required(
        client
            .create_support_ticket(&NewSupportTicket {
                subject: "Halo".to_string(),
                message: "Tes".to_string(),
                category: None,
            })
            .await,
    );
    assert_auth_required(client.flush_pending_support_tickets().await);
}

// =============================================================================
// Anonymous
// =============================================================================

#[tokio::test]
async fn test_add_to_wishlist_without_credential_makes_no_writes() {
    let server = backend_expecting_no_calls().await;
    let store = Arc::new(MemoryStore::new());
    let client = client(&[server.uri()], store.clone());

    assert_auth_required(client.add_to_wishlist(ProductId::new(42)).await);

    assert!(store.is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_anonymous_gated_calls_never_reach_network() {
    let server = backend_expecting_no_calls().await;
    let store = Arc::new(MemoryStore::new());
    let client = client(&[server.uri()], store.clone());

    assert_every_gated_call_fails(&client).await;

    assert!(store.is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}

// =============================================================================
// Demo Session
// =============================================================================

#[tokio::test]
async fn test_demo_session_is_not_authenticated() {
    let store = Arc::new(MemoryStore::new());
    store.set("authToken", "demo-token-123").unwrap();
    store
        .set(
            "user",
            r#"{"id":"demo-user","username":"Demo User","email":"demo@thrifting.com","created_at":"2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();

    let client = client(&["http://127.0.0.1:9"], store);

    assert!(!client.is_authenticated().unwrap());
    assert!(client.is_demo_user().unwrap());
}

#[tokio::test]
async fn test_demo_session_gated_calls_never_reach_network() {
    let server = backend_expecting_no_calls().await;
    let store = Arc::new(MemoryStore::new());
    let client = client(&[server.uri()], store.clone());
    client.create_demo_user().unwrap();
    let keys_before = store.len();

    assert_every_gated_call_fails(&client).await;

    assert_eq!(store.len(), keys_before);
    assert!(server.received_requests().await.unwrap().is_empty());
}
