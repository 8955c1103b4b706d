//! Domain resource helpers.
//!
//! Each helper first asks the backend. On failure it propagates
//! [`ApiError::AuthenticationRequired`] untouched and otherwise falls back to
//! a cached copy, a local mutation or built-in defaults, depending on the
//! resource.

mod auth;
mod diagnostics;
mod notifications;
mod products;
mod profile;
mod reference;
mod settings;
mod support;
mod wishlist;

pub use auth::AuthResponse;
pub use diagnostics::AppStatus;
pub use products::mock_products;
pub use reference::{default_faqs, default_stores};
pub use settings::SettingsAck;
pub use support::{FlushReport, TicketReceipt};

use tracing::warn;

use thrift_core::User;

use crate::client::ApiClient;
use crate::error::{ApiError, Result};
use crate::session::Session;

/// Resolve a backend result, falling back on any error except
/// `AuthenticationRequired`.
pub(crate) fn or_fallback<T>(
    result: Result<T>,
    resource: &'static str,
    fallback: impl FnOnce() -> Result<T>,
) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if e.is_auth_required() => Err(e),
        Err(e) => {
            warn!(resource, error = %e, "Backend unavailable, using local fallback");
            fallback()
        }
    }
}

impl ApiClient {
    /// The stored user of a fully authenticated session.
    ///
    /// Demo and anonymous sessions yield `AuthenticationRequired`.
    pub(crate) fn require_session_user(&self) -> Result<User> {
        match self.sessions().load()? {
            Session::Authenticated { user, .. } => Ok(user),
            Session::Demo { .. } | Session::Anonymous => Err(ApiError::AuthenticationRequired),
        }
    }
}
