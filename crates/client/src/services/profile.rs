//! User profile.

use tracing::{instrument, warn};

use thrift_core::{User, UserId, UserUpdate};

use crate::client::ApiClient;
use crate::error::{ApiError, Result};
use crate::request::RequestOptions;

impl ApiClient {
    /// Profile of `user_id`, or of the current user when `None`.
    ///
    /// Falls back to the stored user when the endpoint is unavailable, but
    /// only if that user is the one asked for.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationRequired` without a session, or the
    /// request error when there is no matching stored user to fall back to.
    #[instrument(skip(self))]
    pub async fn user_profile(&self, user_id: Option<&UserId>) -> Result<User> {
        let path = user_id.map_or_else(|| "/users/me".to_string(), |id| format!("/users/{id}"));

        match self
            .request_json::<User>(&path, RequestOptions::get().requires_auth())
            .await
        {
            Ok(user) => Ok(user),
            Err(e) if e.is_auth_required() => Err(e),
            Err(e) => match self.sessions().current_user()? {
                Some(stored) if user_id.is_none_or(|id| *id == stored.id) => {
                    warn!(error = %e, "Profile endpoint unavailable, using stored user");
                    Ok(stored)
                }
                _ => Err(e),
            },
        }
    }

    /// Update the current user's profile.
    ///
    /// When the endpoint is unavailable the update is merged into the stored
    /// user instead.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationRequired` without a session, or
    /// `ApiError::NoCurrentUser` when offline with no stored user.
    #[instrument(skip(self, update))]
    pub async fn update_user_profile(&self, update: &UserUpdate) -> Result<User> {
        let result = self
            .request_json::<User>(
                "/users/me",
                RequestOptions::put().json(update)?.requires_auth(),
            )
            .await;

        super::or_fallback(result, "profile", || {
            let mut user = self
                .sessions()
                .current_user()?
                .ok_or(ApiError::NoCurrentUser)?;
            user.apply(update.clone());
            self.sessions().save_user(&user)?;
            Ok(user)
        })
    }
}
