//! Request options and decoded responses.

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Options for one logical request.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub(crate) method: Method,
    pub(crate) body: Option<serde_json::Value>,
    pub(crate) headers: HeaderMap,
    pub(crate) requires_auth: bool,
    pub(crate) retry_count: Option<u32>,
}

impl RequestOptions {
    /// Options for `method` without body, auth requirement or overrides.
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            body: None,
            headers: HeaderMap::new(),
            requires_auth: false,
            retry_count: None,
        }
    }

    #[must_use]
    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    #[must_use]
    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    #[must_use]
    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    #[must_use]
    pub fn patch() -> Self {
        Self::new(Method::PATCH)
    }

    #[must_use]
    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` if `body` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("unserializable body: {e}")))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Fail fast with `AuthenticationRequired` when no real token is stored.
    #[must_use]
    pub const fn requires_auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    /// Override the configured retry count for this call.
    #[must_use]
    pub const fn retries(mut self, retry_count: u32) -> Self {
        self.retry_count = Some(retry_count);
        self
    }

    /// Add an extra header.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` if the name or value is not a valid header.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self, ApiError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::InvalidRequest(format!("invalid header name {name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::InvalidRequest(format!("invalid header value: {e}")))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }
}

/// A successful response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse {
    /// Body of a response whose content type mentions `application/json`.
    Json(serde_json::Value),
    /// Any other body, verbatim.
    Text(String),
}

impl ApiResponse {
    /// Decode into `T`.
    ///
    /// An empty text body decodes as JSON `null`; other text is tried as JSON
    /// first and then as a plain string.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Decode` if the body does not match `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let value = match self {
            Self::Json(value) => value,
            Self::Text(text) if text.trim().is_empty() => serde_json::Value::Null,
            Self::Text(text) => serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text)),
        };
        Ok(serde_json::from_value(value)?)
    }

    /// Interpret a mutation response as an acknowledgement.
    ///
    /// The request already succeeded at HTTP level, so anything other than an
    /// explicit `{"ok": false}` counts as `ok`.
    #[must_use]
    pub fn ack(self) -> Ack {
        match self {
            Self::Json(value) => Ack {
                ok: value
                    .get("ok")
                    .and_then(serde_json::Value::as_bool)
                    .unwrap_or(true),
            },
            Self::Text(_) => Ack::OK,
        }
    }
}

/// Outcome of a mutation that returns no resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
}

impl Ack {
    pub const OK: Self = Self { ok: true };
    pub const FAILED: Self = Self { ok: false };
}
