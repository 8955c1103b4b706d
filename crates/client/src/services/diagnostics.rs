//! Backend reachability probe and application startup.

use tracing::{info, instrument, warn};

use thrift_core::User;

use crate::client::ApiClient;
use crate::error::Result;
use crate::request::RequestOptions;

/// Endpoints tried, without retries, after `/products` fails.
const PROBE_ENDPOINTS: &[&str] = &["/health", "/", "/api/health"];

/// State reported once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppStatus {
    pub backend_connected: bool,
    pub authenticated: bool,
    /// Present only when `authenticated`.
    pub user: Option<User>,
}

impl ApiClient {
    /// Whether any backend host answers.
    ///
    /// Tries `/products` with one retry, then each probe endpoint once.
    #[instrument(skip(self))]
    pub async fn test_backend_connection(&self) -> bool {
        if self
            .request("/products", RequestOptions::get().retries(1))
            .await
            .is_ok()
        {
            info!(endpoint = "/products", "Backend reachable");
            return true;
        }

        for endpoint in PROBE_ENDPOINTS {
            if self
                .request(endpoint, RequestOptions::get().retries(0))
                .await
                .is_ok()
            {
                info!(endpoint, "Backend reachable");
                return true;
            }
        }

        warn!("Backend unreachable, running in fallback mode");
        false
    }

    /// Probe the backend and report the session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Storage` if the session cannot be read.
    #[instrument(skip(self))]
    pub async fn initialize_app(&self) -> Result<AppStatus> {
        let backend_connected = self.test_backend_connection().await;
        let user = self.authenticated_user()?;

        let status = AppStatus {
            backend_connected,
            authenticated: user.is_some(),
            user,
        };
        info!(
            backend_connected = status.backend_connected,
            authenticated = status.authenticated,
            "Application initialized"
        );
        Ok(status)
    }
}
