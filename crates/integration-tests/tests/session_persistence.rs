//! Integration tests for sessions stored in a file-backed store.
//!
//! Reopening the store stands in for a page reload.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use secrecy::ExposeSecret;
use thrift_client::{FileStore, Session};
use thrift_core::{Email, LoginPayload};
use thrift_integration_tests::client;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn backend_with_login(token: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "token": token })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "77",
            "username": "maya",
            "email": "maya@thrift.id",
            "created_at": "2025-11-02T13:00:00Z"
        })))
        .mount(&server)
        .await;
    server
}

fn payload() -> LoginPayload {
    LoginPayload {
        email: Email::parse("maya@thrift.id").unwrap(),
        password: "rahasia123".to_string(),
    }
}

#[tokio::test]
async fn test_login_survives_reload() {
    let server = backend_with_login("tok-maya").await;
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("session.json");

    let auth = {
        let store = Arc::new(FileStore::open(&file).unwrap());
        let client = client(&[server.uri()], store);
        client.login(&payload()).await.unwrap()
    };

    let reopened = Arc::new(FileStore::open(&file).unwrap());
    let client = client(&[server.uri()], reopened);

    match client.sessions().load().unwrap() {
        Session::Authenticated { token, user } => {
            assert_eq!(token.expose_secret(), auth.token.expose_secret());
            assert_eq!(user, auth.user);
        }
        other => panic!("expected authenticated session, got {other:?}"),
    }
    assert!(client.is_authenticated().unwrap());
}

#[tokio::test]
async fn test_logout_survives_reload() {
    let server = backend_with_login("tok-maya").await;
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("session.json");

    {
        let client = client(&[server.uri()], Arc::new(FileStore::open(&file).unwrap()));
        client.login(&payload()).await.unwrap();
        assert_eq!(client.logout().unwrap(), "/");
    }

    let client = client(&[server.uri()], Arc::new(FileStore::open(&file).unwrap()));
    assert!(matches!(client.sessions().load().unwrap(), Session::Anonymous));
}

#[tokio::test]
async fn test_corrupted_user_is_purged_on_reload() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("session.json");
    std::fs::write(&file, r#"{"authToken":"tok-x","user":"{not json"}"#).unwrap();

    let client = client(&["http://127.0.0.1:9"], Arc::new(FileStore::open(&file).unwrap()));
    assert!(client.current_user().unwrap().is_none());
    assert!(!client.is_authenticated().unwrap());

    let on_disk = std::fs::read_to_string(&file).unwrap();
    assert!(!on_disk.contains("\"user\""));
    assert!(on_disk.contains("tok-x"));
}
