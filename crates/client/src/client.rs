//! Request core of the storefront API client.
//!
//! Uses `reqwest` for HTTP and walks the configured hosts round-robin:
//! every round tries each host once, in order, and rounds are separated by a
//! linearly growing backoff. Falling back to local data is not done here;
//! resource helpers in [`crate::services`] decide that one layer up.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use thrift_core::{Product, ProductId};

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::request::{ApiResponse, RequestOptions};
use crate::session::SessionStore;
use crate::storage::KeyValueStore;

/// How long product detail responses stay in memory.
const PRODUCT_CACHE_TTL: Duration = Duration::from_secs(300);
const PRODUCT_CACHE_CAPACITY: u64 = 1000;

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the thrift storefront backend.
///
/// Cheap to clone; clones share the HTTP connection pool, the local store
/// and the in-memory product cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    config: ClientConfig,
    hosts: Vec<String>,
    store: Arc<dyn KeyValueStore>,
    sessions: SessionStore,
    product_cache: Cache<ProductId, Product>,
}

/// Why a single attempt failed.
#[derive(Debug)]
enum AttemptError {
    Status(reqwest::StatusCode),
    Transport(reqwest::Error),
    Body(serde_json::Error),
}

impl ApiClient {
    /// Create a client over `store`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client fails to build.
    pub fn new(config: ClientConfig, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;

        let product_cache = Cache::builder()
            .max_capacity(PRODUCT_CACHE_CAPACITY)
            .time_to_live(PRODUCT_CACHE_TTL)
            .build();

        let hosts = config.hosts();
        let sessions = SessionStore::new(Arc::clone(&store));

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                config,
                hosts,
                store,
                sessions,
                product_cache,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The injected local store.
    #[must_use]
    pub fn store(&self) -> &dyn KeyValueStore {
        self.inner.store.as_ref()
    }

    /// Session view over the local store.
    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    pub(crate) fn product_cache(&self) -> &Cache<ProductId, Product> {
        &self.inner.product_cache
    }

    /// Perform one logical request.
    ///
    /// `path` is either root-relative (joined to every configured host) or an
    /// absolute `http(s)://` URL (hosts are ignored).
    ///
    /// A stored real token is always sent as a bearer credential. When
    /// `options` requires auth and no such token exists, the call fails
    /// before touching the network.
    ///
    /// # Errors
    ///
    /// - `ApiError::AuthenticationRequired` - auth required, no real token
    /// - `ApiError::NetworkExhausted` - every host failed in every round
    /// - `ApiError::Storage` - the token could not be read
    #[instrument(skip(self, options), fields(method = %options.method))]
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<ApiResponse> {
        let token = self.inner.sessions.bearer_token()?;
        if options.requires_auth && token.is_none() {
            debug!("No credential stored for auth-gated request");
            return Err(ApiError::AuthenticationRequired);
        }

        let targets = self.targets(path);
        let retry_count = options.retry_count.unwrap_or(self.inner.config.retry_count);

        let mut attempts: u32 = 0;
        let mut last_status = None;

        for round in 0..=retry_count {
            if round > 0 {
                self.sleep_with_backoff(round).await;
            }

            for url in &targets {
                attempts += 1;
                debug!(attempt = attempts, round = round + 1, %url, "sending API request");

                match self.attempt(url, &options, token.as_ref()).await {
                    Ok(response) => {
                        debug!(attempt = attempts, %url, "API request succeeded");
                        return Ok(response);
                    }
                    Err(AttemptError::Status(status)) => {
                        last_status = Some(status.as_u16());
                        warn!(attempt = attempts, %url, %status, "API request returned non-success status");
                    }
                    Err(AttemptError::Transport(e)) => {
                        warn!(attempt = attempts, %url, error = %e, "API request failed");
                    }
                    Err(AttemptError::Body(e)) => {
                        warn!(attempt = attempts, %url, error = %e, "API response body was not valid JSON");
                    }
                }
            }
        }

        Err(ApiError::NetworkExhausted {
            method: options.method,
            path: path.to_string(),
            attempts,
            last_status,
        })
    }

    /// [`request`](Self::request) and decode the body into `T`.
    ///
    /// # Errors
    ///
    /// Everything `request` returns, plus `ApiError::Decode` on a shape mismatch.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T> {
        self.request(path, options).await?.decode()
    }

    /// Full URLs to try, in order, for one round.
    fn targets(&self, path: &str) -> Vec<String> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return vec![path.to_string()];
        }

        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        self.inner
            .hosts
            .iter()
            .map(|host| format!("{host}{path}"))
            .collect()
    }

    /// Send a single attempt.
    async fn attempt(
        &self,
        url: &str,
        options: &RequestOptions,
        token: Option<&SecretString>,
    ) -> std::result::Result<ApiResponse, AttemptError> {
        let mut builder = self
            .inner
            .client
            .request(options.method.clone(), url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .headers(options.headers.clone());

        if let Some(token) = token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }
        if let Some(timeout) = self.inner.config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(AttemptError::Transport)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(
                %status,
                body = %body.chars().take(200).collect::<String>(),
                "Non-success response body"
            );
            return Err(AttemptError::Status(status));
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));

        let text = response.text().await.map_err(AttemptError::Transport)?;

        if !is_json {
            return Ok(ApiResponse::Text(text));
        }
        if text.trim().is_empty() {
            return Ok(ApiResponse::Json(serde_json::Value::Null));
        }
        serde_json::from_str(&text)
            .map(ApiResponse::Json)
            .map_err(AttemptError::Body)
    }

    async fn sleep_with_backoff(&self, round: u32) {
        let delay = self.inner.config.backoff.saturating_mul(round);
        if !delay.is_zero() {
            debug!(round, delay_ms = delay.as_millis(), "Backing off before next round");
            tokio::time::sleep(delay).await;
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("hosts", &self.inner.hosts)
            .field("retry_count", &self.inner.config.retry_count)
            .finish_non_exhaustive()
    }
}
