//! Registration, login and session helpers.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use thrift_core::{Email, LoginPayload, RegisterPayload, User, UserId};

use crate::client::ApiClient;
use crate::error::{ApiError, Result};
use crate::request::RequestOptions;
use crate::session::Session;

/// Path the UI navigates to after logout.
const ROOT_PATH: &str = "/";

/// Token and user of a freshly created session.
#[derive(Debug, Clone)]
pub struct AuthResponse {
    pub token: SecretString,
    pub user: User,
}

#[derive(Deserialize)]
struct RegisterResponse {
    #[serde(default)]
    token: Option<String>,
    user: User,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
}

/// `GET /users/me` as returned right after login; any field may be missing.
#[derive(Deserialize)]
struct ProfileResponse {
    #[serde(default)]
    id: Option<UserId>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<Email>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl ProfileResponse {
    fn into_user(self, login_email: &Email) -> User {
        User {
            id: self.id.unwrap_or_else(|| UserId::new("unknown")),
            username: self
                .username
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| login_email.local_part().to_string()),
            email: self.email.unwrap_or_else(|| login_email.clone()),
            created_at: self.created_at.unwrap_or_else(Utc::now),
        }
    }
}

/// Best-effort user when the profile endpoint is unavailable after login.
fn fallback_user(email: &Email) -> User {
    let now = Utc::now();
    User {
        id: UserId::new(format!("temp-{}", now.timestamp_millis())),
        username: email.local_part().to_string(),
        email: email.clone(),
        created_at: now,
    }
}

fn non_empty_token(token: Option<String>) -> Result<SecretString> {
    token
        .filter(|t| !t.is_empty())
        .map(SecretString::from)
        .ok_or(ApiError::MissingToken)
}

impl ApiClient {
    /// Create an account and persist the returned session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::MissingToken` if the backend returns no token, or
    /// any request error.
    #[instrument(skip(self, payload), fields(email = %payload.email))]
    pub async fn register(&self, payload: &RegisterPayload) -> Result<AuthResponse> {
        let response: RegisterResponse = self
            .request_json("/auth/register", RequestOptions::post().json(payload)?)
            .await?;

        let token = non_empty_token(response.token)?;
        self.sessions().save(&token, &response.user)?;

        info!(user_id = %response.user.id, "Registered new account");
        Ok(AuthResponse {
            token,
            user: response.user,
        })
    }

    /// Log in and persist the session.
    ///
    /// Succeeds whenever a token is obtained. The profile is then fetched
    /// with that token; if that fails a user is derived from the login email.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::MissingToken` if the backend returns no token, or
    /// any error of the login request itself.
    #[instrument(skip(self, payload), fields(email = %payload.email))]
    pub async fn login(&self, payload: &LoginPayload) -> Result<AuthResponse> {
        let response: LoginResponse = self
            .request_json("/auth/login", RequestOptions::post().json(payload)?)
            .await?;

        let token = non_empty_token(response.token)?;
        self.sessions().save_token(&token)?;

        let user = match self
            .request_json::<ProfileResponse>("/users/me", RequestOptions::get().requires_auth())
            .await
        {
            Ok(profile) => profile.into_user(&payload.email),
            Err(e) => {
                warn!(error = %e, "Could not fetch profile after login, using fallback user");
                fallback_user(&payload.email)
            }
        };

        self.sessions().save_user(&user)?;
        info!(user_id = %user.id, "Logged in");

        Ok(AuthResponse { token, user })
    }

    /// Clear the session and return the path to navigate to.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Storage` if the session keys cannot be removed.
    pub fn logout(&self) -> Result<&'static str> {
        self.sessions().clear()?;
        info!("Logged out");
        Ok(ROOT_PATH)
    }

    /// The stored user, authenticated or not.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Storage` if the store cannot be read.
    pub fn current_user(&self) -> Result<Option<User>> {
        Ok(self.sessions().current_user()?)
    }

    /// Whether a real token and a real user are both stored.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Storage` if the store cannot be read.
    pub fn is_authenticated(&self) -> Result<bool> {
        Ok(self.sessions().load()?.is_authenticated())
    }

    /// Whether either stored half is a demo placeholder.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Storage` if the store cannot be read.
    pub fn is_demo_user(&self) -> Result<bool> {
        Ok(self.sessions().load()?.is_demo())
    }

    /// Store a cosmetic demo session. It never counts as authenticated.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Storage` if the store cannot be written.
    pub fn create_demo_user(&self) -> Result<User> {
        let user = self.sessions().create_demo_user()?;
        debug!("Created demo session");
        Ok(user)
    }

    /// The stored user, only when truly authenticated.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Storage` if the store cannot be read.
    pub fn authenticated_user(&self) -> Result<Option<User>> {
        Ok(self.sessions().load()?.authenticated_user().cloned())
    }

    /// Startup check: purge demo leftovers unless the session is real.
    ///
    /// Returns the session as it stands afterwards.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Storage` if the store cannot be read or written.
    #[instrument(skip(self))]
    pub fn initialize_user(&self) -> Result<Session> {
        let session = self.sessions().load()?;
        if session.is_authenticated() {
            debug!("Stored session is authenticated");
            return Ok(session);
        }

        if self.sessions().purge_demo()? {
            info!("Removed demo session placeholders");
        }
        Ok(self.sessions().load()?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use secrecy::ExposeSecret;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::client::tests::client_for;
    use crate::storage::{KeyValueStore, MemoryStore, keys};

    fn login_payload() -> LoginPayload {
        LoginPayload {
            email: Email::parse("sari@thrift.id").unwrap(),
            password: "rahasia".to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_fetches_profile_with_new_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "token": "tok-7" })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .and(header("authorization", "Bearer tok-7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "7",
                "username": "sari",
                "email": "sari@thrift.id",
                "created_at": "2026-01-01T00:00:00Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let client = client_for(&[&server.uri()], store.clone());
        let auth = client.login(&login_payload()).await.unwrap();

        assert_eq!(auth.token.expose_secret(), "tok-7");
        assert_eq!(auth.user.id.as_str(), "7");
        assert!(client.is_authenticated().unwrap());
        assert_eq!(store.get(keys::AUTH_TOKEN).unwrap().as_deref(), Some("tok-7"));
    }

    #[tokio::test]
    async fn test_login_survives_missing_profile() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "token": "tok-8" })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&[&server.uri()], Arc::new(MemoryStore::new()));
        let auth = client.login(&login_payload()).await.unwrap();

        assert!(auth.user.id.as_str().starts_with("temp-"));
        assert_eq!(auth.user.username, "sari");
        assert_eq!(client.current_user().unwrap(), Some(auth.user));
    }

    #[tokio::test]
    async fn test_login_without_token_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "message": "ok" })))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let client = client_for(&[&server.uri()], store.clone());
        let result = client.login(&login_payload()).await;

        assert!(matches!(result, Err(ApiError::MissingToken)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_register_persists_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "token": "tok-new",
                "user": {
                    "id": "21",
                    "username": "budi",
                    "email": "budi@thrift.id",
                    "created_at": "2026-02-01T08:00:00Z"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&[&server.uri()], Arc::new(MemoryStore::new()));
        let payload = RegisterPayload {
            username: "budi".to_string(),
            email: Email::parse("budi@thrift.id").unwrap(),
            password: "rahasia".to_string(),
        };
        let auth = client.register(&payload).await.unwrap();

        assert_eq!(auth.user.username, "budi");
        assert_eq!(client.authenticated_user().unwrap(), Some(auth.user));
    }

    #[test]
    fn test_logout_clears_session() {
        let store = Arc::new(MemoryStore::new());
        let client = client_for(&["http://localhost:9"], store.clone());
        store.set(keys::AUTH_TOKEN, "tok").unwrap();

        assert_eq!(client.logout().unwrap(), "/");
        assert!(store.is_empty());
    }

    #[test]
    fn test_demo_session_is_not_authenticated() {
        let client = client_for(&["http://localhost:9"], Arc::new(MemoryStore::new()));
        client.create_demo_user().unwrap();

        assert!(client.is_demo_user().unwrap());
        assert!(!client.is_authenticated().unwrap());
        assert!(client.authenticated_user().unwrap().is_none());

        let session = client.initialize_user().unwrap();
        assert!(matches!(session, Session::Anonymous));
        assert!(!client.is_demo_user().unwrap());
    }
}
