//! Client configuration.
//!
//! # Environment Variables
//!
//! All optional:
//! - `THRIFT_API_BASE` - Primary backend base URL (default: `http://localhost:8081`)
//! - `THRIFT_API_FALLBACK_HOSTS` - Comma-separated fallback base URLs
//!   (default: `http://localhost:8081,http://127.0.0.1:8081`)
//! - `THRIFT_API_RETRIES` - Extra rounds over the host list after the first (default: 1)
//! - `THRIFT_API_BACKOFF_MS` - Linear backoff step between rounds (default: 1000)
//! - `THRIFT_API_TIMEOUT_SECS` - Per-attempt timeout; unset means no timeout

use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE: &str = "http://localhost:8081";
const DEFAULT_FALLBACK_HOSTS: &[&str] = &["http://localhost:8081", "http://127.0.0.1:8081"];
const DEFAULT_RETRY_COUNT: u32 = 1;
const DEFAULT_BACKOFF_MS: u64 = 1000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid backend host {0}: {1}")]
    InvalidHost(String, String),
}

/// Configuration for [`ApiClient`](crate::ApiClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend tried first on every round.
    pub primary_host: Url,
    /// Backends tried after the primary, in order.
    pub fallback_hosts: Vec<Url>,
    /// Number of extra rounds over the host list after the first one.
    pub retry_count: u32,
    /// Linear backoff step; round `n` waits `backoff * n` before starting.
    pub backoff: Duration,
    /// Per-attempt timeout. `None` leaves timing to the network stack.
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Configuration for a single backend with the default retry policy.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidHost` if `primary_host` is not an
    /// absolute http(s) URL.
    pub fn new(primary_host: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            primary_host: parse_host(primary_host)?,
            fallback_hosts: Vec::new(),
            retry_count: DEFAULT_RETRY_COUNT,
            backoff: Duration::from_millis(DEFAULT_BACKOFF_MS),
            request_timeout: None,
        })
    }

    /// Add fallback hosts, tried in order after the primary.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidHost` for the first unparseable host.
    pub fn with_fallback_hosts<I, S>(mut self, hosts: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for host in hosts {
            self.fallback_hosts.push(parse_host(host.as_ref())?);
        }
        Ok(self)
    }

    #[must_use]
    pub const fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    #[must_use]
    pub const fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let primary = lookup("THRIFT_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let fallback_hosts: Vec<String> = lookup("THRIFT_API_FALLBACK_HOSTS").map_or_else(
            || DEFAULT_FALLBACK_HOSTS.iter().map(ToString::to_string).collect(),
            |raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|h| !h.is_empty())
                    .map(String::from)
                    .collect()
            },
        );

        let retry_count = parse_var(&lookup, "THRIFT_API_RETRIES", DEFAULT_RETRY_COUNT)?;
        let backoff_ms = parse_var(&lookup, "THRIFT_API_BACKOFF_MS", DEFAULT_BACKOFF_MS)?;

        let mut config = Self::new(&primary)?
            .with_fallback_hosts(fallback_hosts)?
            .with_retry_count(retry_count)
            .with_backoff(Duration::from_millis(backoff_ms));

        if lookup("THRIFT_API_TIMEOUT_SECS").is_some() {
            let secs: u64 = parse_var(&lookup, "THRIFT_API_TIMEOUT_SECS", 0)?;
            config = config.with_request_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Candidate base URLs in attempt order, primary first, duplicates removed.
    ///
    /// Returned without a trailing slash so root-relative paths append cleanly.
    #[must_use]
    pub fn hosts(&self) -> Vec<String> {
        let mut hosts: Vec<String> = Vec::with_capacity(1 + self.fallback_hosts.len());
        for url in std::iter::once(&self.primary_host).chain(&self.fallback_hosts) {
            let host = url.as_str().trim_end_matches('/').to_string();
            if !hosts.contains(&host) {
                hosts.push(host);
            }
        }
        hosts
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        let parse = |s: &str| Url::parse(s).expect("default backend URL is valid");
        Self {
            primary_host: parse(DEFAULT_API_BASE),
            fallback_hosts: DEFAULT_FALLBACK_HOSTS.iter().map(|h| parse(h)).collect(),
            retry_count: DEFAULT_RETRY_COUNT,
            backoff: Duration::from_millis(DEFAULT_BACKOFF_MS),
            request_timeout: None,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse and validate a backend base URL.
fn parse_host(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidHost(raw.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidHost(
            raw.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_dedupe_primary_host() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(
            config.hosts(),
            vec!["http://localhost:8081", "http://127.0.0.1:8081"]
        );
        assert_eq!(config.retry_count, 1);
        assert_eq!(config.backoff, Duration::from_millis(1000));
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_default_matches_empty_environment() {
        let config = ClientConfig::default();
        let loaded = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.hosts(), loaded.hosts());
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("THRIFT_API_BASE", "https://api.thrift.id/"),
            ("THRIFT_API_FALLBACK_HOSTS", " https://backup.thrift.id , "),
            ("THRIFT_API_RETRIES", "3"),
            ("THRIFT_API_BACKOFF_MS", "250"),
            ("THRIFT_API_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(
            config.hosts(),
            vec!["https://api.thrift.id", "https://backup.thrift.id"]
        );
        assert_eq!(config.retry_count, 3);
        assert_eq!(config.backoff, Duration::from_millis(250));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_invalid_retry_count() {
        let result = ClientConfig::from_lookup(lookup_from(&[("THRIFT_API_RETRIES", "many")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(key, _)) if key == "THRIFT_API_RETRIES"));
    }

    #[test]
    fn test_invalid_host_scheme() {
        let result = ClientConfig::new("ftp://files.thrift.id");
        assert!(matches!(result, Err(ConfigError::InvalidHost(_, _))));
        assert!(ClientConfig::new("not a url").is_err());
    }
}
