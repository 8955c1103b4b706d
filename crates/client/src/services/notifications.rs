//! In-app notifications. No local fallback.

use tracing::instrument;

use thrift_core::{Notification, NotificationId};

use crate::client::ApiClient;
use crate::error::Result;
use crate::request::{Ack, RequestOptions};

impl ApiClient {
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationRequired` without a session, or any
    /// request error.
    #[instrument(skip(self))]
    pub async fn notifications(&self) -> Result<Vec<Notification>> {
        self.request_json::<Option<Vec<Notification>>>(
            "/notifications",
            RequestOptions::get().requires_auth(),
        )
        .await
        .map(Option::unwrap_or_default)
    }

    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationRequired` without a session, or any
    /// request error.
    #[instrument(skip(self), fields(notification_id = %id))]
    pub async fn mark_notification_read(&self, id: &NotificationId) -> Result<Ack> {
        let response = self
            .request(
                &format!("/notifications/{id}/read"),
                RequestOptions::post().requires_auth(),
            )
            .await?;
        Ok(response.ack())
    }
}
