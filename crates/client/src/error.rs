//! Error taxonomy for the API client.
//!
//! Transport failures are raised by the request core; each resource helper
//! decides one layer up whether to fall back or propagate. Only
//! [`ApiError::AuthenticationRequired`] is guaranteed to reach the UI
//! untouched.

use reqwest::Method;
use thiserror::Error;

use thrift_core::ProductId;

use crate::storage::StorageError;

/// Errors that can occur when talking to the storefront backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The operation needs a real session and none is stored.
    ///
    /// Raised before any network attempt. Never retried, never absorbed by a
    /// fallback.
    #[error("authentication required - please login")]
    AuthenticationRequired,

    /// Every host and attempt failed.
    #[error("all API attempts failed for {method} {path} ({attempts} attempts{}); backend may be unavailable", format_last_status(.last_status))]
    NetworkExhausted {
        /// HTTP method of the request.
        method: Method,
        /// Path as given by the caller, without host.
        path: String,
        /// Total attempts made across all hosts.
        attempts: u32,
        /// Status of the last HTTP response received, if any.
        last_status: Option<u16>,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request could not be built (bad header, unserializable body).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Login succeeded at HTTP level but returned no token.
    #[error("login failed - no token received")]
    MissingToken,

    /// Product detail could not be loaded.
    #[error("product {0} not found or unavailable")]
    ProductNotFound(ProductId),

    /// A local fallback needed the stored user but there is none.
    #[error("no current user stored")]
    NoCurrentUser,

    /// Response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Local storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Whether this error means the caller must log in first.
    ///
    /// This is the only error every fallback must let through.
    #[must_use]
    pub const fn is_auth_required(&self) -> bool {
        matches!(self, Self::AuthenticationRequired)
    }

    /// Message safe to show to the shopper, in the storefront's language.
    ///
    /// Technical details stay in logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::AuthenticationRequired => "Anda harus login terlebih dahulu.".to_string(),
            Self::NetworkExhausted { .. } => {
                "Server sedang tidak dapat dihubungi. Silakan coba lagi nanti.".to_string()
            }
            Self::MissingToken => "Login gagal - token tidak diterima.".to_string(),
            Self::ProductNotFound(_) => {
                "Produk tidak ditemukan atau terjadi kesalahan.".to_string()
            }
            Self::NoCurrentUser => "User tidak ditemukan.".to_string(),
            Self::Http(_) | Self::InvalidRequest(_) | Self::Decode(_) | Self::Storage(_) => {
                "Terjadi kesalahan. Silakan coba lagi.".to_string()
            }
        }
    }
}

#[allow(clippy::ref_option)]
fn format_last_status(status: &Option<u16>) -> String {
    status.map_or_else(String::new, |s| format!(", last status {s}"))
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_exhausted_names_method_and_path() {
        let err = ApiError::NetworkExhausted {
            method: Method::GET,
            path: "/products".to_string(),
            attempts: 6,
            last_status: Some(500),
        };
        assert_eq!(
            err.to_string(),
            "all API attempts failed for GET /products (6 attempts, last status 500); backend may be unavailable"
        );

        let err = ApiError::NetworkExhausted {
            method: Method::DELETE,
            path: "/wishlist/42".to_string(),
            attempts: 2,
            last_status: None,
        };
        assert_eq!(
            err.to_string(),
            "all API attempts failed for DELETE /wishlist/42 (2 attempts); backend may be unavailable"
        );
    }

    #[test]
    fn test_only_authentication_required_is_auth_error() {
        assert!(ApiError::AuthenticationRequired.is_auth_required());
        assert!(!ApiError::NoCurrentUser.is_auth_required());
        assert!(!ApiError::MissingToken.is_auth_required());
    }

    #[test]
    fn test_user_messages_are_localized() {
        assert_eq!(
            ApiError::ProductNotFound(ProductId::new(3)).user_message(),
            "Produk tidak ditemukan atau terjadi kesalahan."
        );
        assert_eq!(
            ApiError::NoCurrentUser.user_message(),
            "User tidak ditemukan."
        );
    }
}
