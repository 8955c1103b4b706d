//! Locale and notification preferences.
//!
//! The backend is authoritative when reachable. Every successful read or
//! write refreshes the local copy, and writes that cannot reach the backend
//! are kept locally only; they are not replayed later.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use thrift_core::{LocaleSettings, NotificationSettings};

use crate::client::ApiClient;
use crate::error::Result;
use crate::request::RequestOptions;
use crate::storage::{KeyValueStoreExt, keys};

/// Outcome of a settings write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsAck {
    pub ok: bool,
    /// The backend was unreachable and only the local copy was updated.
    pub cached: bool,
}

impl ApiClient {
    /// Locale settings: backend, else the cached copy, else `None`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationRequired` without a session.
    #[instrument(skip(self))]
    pub async fn user_settings(&self) -> Result<Option<LocaleSettings>> {
        let result = self
            .request_json::<Option<LocaleSettings>>("/settings", RequestOptions::get().requires_auth())
            .await;

        match result {
            Ok(settings) => {
                if let Some(settings) = &settings {
                    self.cache_quietly(keys::USER_SETTINGS, settings);
                }
                Ok(settings)
            }
            Err(e) if e.is_auth_required() => Err(e),
            Err(e) => {
                warn!(error = %e, "Settings unavailable, using cached copy");
                Ok(self
                    .store()
                    .read_json(keys::USER_SETTINGS)
                    .unwrap_or_else(|e| {
                        warn!(error = %e, "Failed to read cached settings");
                        None
                    }))
            }
        }
    }

    /// Save locale settings, mirroring them locally either way.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationRequired` without a session, or
    /// `ApiError::Storage` if an offline write cannot be recorded locally.
    #[instrument(skip(self, settings))]
    pub async fn update_user_settings(&self, settings: &LocaleSettings) -> Result<SettingsAck> {
        let options = RequestOptions::post().json(settings)?.requires_auth();
        self.write_through("/settings", options, keys::USER_SETTINGS, settings)
            .await
    }

    /// Notification settings: backend, else the cached copy, else all enabled.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationRequired` without a session.
    #[instrument(skip(self))]
    pub async fn notification_settings(&self) -> Result<NotificationSettings> {
        let result = self
            .request_json::<NotificationSettings>(
                "/notifications/settings",
                RequestOptions::get().requires_auth(),
            )
            .await;

        match result {
            Ok(settings) => {
                self.cache_quietly(keys::NOTIFICATION_SETTINGS, &settings);
                Ok(settings)
            }
            Err(e) if e.is_auth_required() => Err(e),
            Err(e) => {
                warn!(error = %e, "Notification settings unavailable, using cached copy");
                let cached = self
                    .store()
                    .read_json(keys::NOTIFICATION_SETTINGS)
                    .unwrap_or_else(|e| {
                        warn!(error = %e, "Failed to read cached notification settings");
                        None
                    });
                Ok(cached.unwrap_or_default())
            }
        }
    }

    /// Save notification settings, mirroring them locally either way.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationRequired` without a session, or
    /// `ApiError::Storage` if an offline write cannot be recorded locally.
    #[instrument(skip(self, settings))]
    pub async fn update_notification_settings(
        &self,
        settings: &NotificationSettings,
    ) -> Result<SettingsAck> {
        let options = RequestOptions::post().json(settings)?.requires_auth();
        self.write_through(
            "/notifications/settings",
            options,
            keys::NOTIFICATION_SETTINGS,
            settings,
        )
        .await
    }

    async fn write_through<T: Serialize + Sync>(
        &self,
        path: &str,
        options: RequestOptions,
        key: &str,
        value: &T,
    ) -> Result<SettingsAck> {
        match self.request(path, options).await {
            Ok(response) => {
                self.cache_quietly(key, value);
                Ok(SettingsAck {
                    ok: response.ack().ok,
                    cached: false,
                })
            }
            Err(e) if e.is_auth_required() => Err(e),
            Err(e) => {
                warn!(error = %e, key, "Backend unavailable, saving locally only");
                self.store().write_json(key, value)?;
                Ok(SettingsAck {
                    ok: true,
                    cached: true,
                })
            }
        }
    }

    /// Refresh a local copy after a successful backend call.
    fn cache_quietly<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        match self.store().write_json(key, value) {
            Ok(()) => debug!(key, "Refreshed local copy"),
            Err(e) => warn!(error = %e, key, "Failed to refresh local copy"),
        }
    }
}
