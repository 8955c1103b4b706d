//! Integration tests for the thrift storefront client.
//!
//! Every scenario runs the public `thrift-client` API against `wiremock`
//! backends and unreachable local ports; no real backend is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p thrift-integration-tests
//!
//! # With client logs
//! RUST_LOG=thrift_client=debug cargo test -p thrift-integration-tests -- --nocapture
//! ```
//!
//! # Test Categories
//!
//! - `offline_fallback` - cached and built-in data when the backend is down
//! - `auth_gate` - auth-gated calls fail before any network or storage access
//! - `session_persistence` - sessions survive reopening a file-backed store
//! - `host_failover` - multi-host retry policy and aggregate errors
//! - `wishlist_sync` - wishlist idempotence and local mirroring

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use secrecy::SecretString;
use serde_json::{Value, json};
use thrift_client::{ApiClient, ClientConfig, KeyValueStore};
use thrift_core::{Email, User, UserId};

/// Install a test subscriber honouring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A base URL on which nothing listens.
///
/// # Panics
///
/// Panics if no local port can be bound.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn unreachable_host() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Client over `hosts` (first is primary) with one retry and a short backoff.
///
/// # Panics
///
/// Panics if `hosts` is empty or contains an invalid URL.
#[allow(clippy::unwrap_used)]
pub fn client<S: AsRef<str>>(hosts: &[S], store: Arc<dyn KeyValueStore>) -> ApiClient {
    init_tracing();
    let (primary, rest) = hosts.split_first().unwrap();
    let config = ClientConfig::new(primary.as_ref())
        .unwrap()
        .with_fallback_hosts(rest)
        .unwrap()
        .with_retry_count(1)
        .with_backoff(Duration::from_millis(10));
    ApiClient::new(config, store).unwrap()
}

/// A user as the backend would return it.
///
/// # Panics
///
/// Panics if `email` is not a valid address.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn user(id: &str, email: &str) -> User {
    User {
        id: UserId::new(id),
        username: Email::parse(email).unwrap().local_part().to_string(),
        email: Email::parse(email).unwrap(),
        created_at: Utc::now(),
    }
}

/// Persist a real session for `user`.
///
/// # Panics
///
/// Panics if the store cannot be written.
#[allow(clippy::unwrap_used)]
pub fn log_in(client: &ApiClient, token: &str, user: &User) {
    client
        .sessions()
        .save(&SecretString::from(token.to_string()), user)
        .unwrap();
}

/// JSON body of a product listing entry.
#[must_use]
pub fn product_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": "Kondisi sangat baik",
        "price": 175000,
        "category": "pakaian",
        "condition": "bekas baik",
        "seller_id": "9",
        "images": [format!("/assets/{id}.jpg")],
        "created_at": "2026-04-12T09:30:00Z"
    })
}
