//! Wishlist backed by the backend, mirrored per user in local storage.

use tracing::{instrument, warn};

use thrift_core::{Product, ProductFilters, ProductId, UserId};

use crate::client::ApiClient;
use crate::error::Result;
use crate::request::{Ack, RequestOptions};
use crate::storage::{KeyValueStoreExt, StorageError, keys};

impl ApiClient {
    /// Products on the current user's wishlist.
    ///
    /// Offline, the local id list is resolved against [`products`](Self::products),
    /// which itself falls back to cached or built-in data.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationRequired` unless the session is
    /// authenticated. Nothing is sent or written in that case.
    #[instrument(skip(self))]
    pub async fn wishlist(&self) -> Result<Vec<Product>> {
        let user = self.require_session_user()?;

        let result = self
            .request_json::<Option<Vec<Product>>>("/wishlist", RequestOptions::get().requires_auth())
            .await;

        match result {
            Ok(products) => Ok(products.unwrap_or_default()),
            Err(e) if e.is_auth_required() => Err(e),
            Err(e) => {
                warn!(error = %e, "Wishlist fetch failed, using local mirror");
                let ids = self.local_wishlist(&user.id);
                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                let products = self.products(&ProductFilters::default()).await?;
                Ok(products.into_iter().filter(|p| ids.contains(&p.id)).collect())
            }
        }
    }

    /// Add a product to the wishlist. Adding twice keeps a single entry.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationRequired` unless the session is
    /// authenticated. Nothing is sent or written in that case.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_to_wishlist(&self, product_id: ProductId) -> Result<Ack> {
        let user = self.require_session_user()?;

        let options = RequestOptions::post()
            .json(&serde_json::json!({ "product_id": product_id }))?
            .requires_auth();

        match self.request("/wishlist", options).await {
            Ok(response) => Ok(response.ack()),
            Err(e) if e.is_auth_required() => Err(e),
            Err(e) => {
                warn!(error = %e, "Wishlist add failed, updating local mirror");
                Ok(self.update_local_wishlist(&user.id, |ids| {
                    if !ids.contains(&product_id) {
                        ids.push(product_id);
                    }
                }))
            }
        }
    }

    /// Remove a product from the wishlist. Removing an absent id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationRequired` unless the session is
    /// authenticated. Nothing is sent or written in that case.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_from_wishlist(&self, product_id: ProductId) -> Result<Ack> {
        let user = self.require_session_user()?;

        match self
            .request(
                &format!("/wishlist/{product_id}"),
                RequestOptions::delete().requires_auth(),
            )
            .await
        {
            Ok(response) => Ok(response.ack()),
            Err(e) if e.is_auth_required() => Err(e),
            Err(e) => {
                warn!(error = %e, "Wishlist remove failed, updating local mirror");
                Ok(self.update_local_wishlist(&user.id, |ids| {
                    ids.retain(|id| *id != product_id);
                }))
            }
        }
    }

    fn local_wishlist(&self, user_id: &UserId) -> Vec<ProductId> {
        match self.store().read_json(&keys::wishlist(user_id)) {
            Ok(ids) => ids.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Failed to read local wishlist");
                Vec::new()
            }
        }
    }

    /// Apply `change` to the local mirror; storage failures become `Ack::FAILED`.
    fn update_local_wishlist(
        &self,
        user_id: &UserId,
        change: impl FnOnce(&mut Vec<ProductId>),
    ) -> Ack {
        let key = keys::wishlist(user_id);
        let write = || -> std::result::Result<(), StorageError> {
            let mut ids: Vec<ProductId> = self.store().read_json(&key)?.unwrap_or_default();
            change(&mut ids);
            self.store().write_json(&key, &ids)
        };

        match write() {
            Ok(()) => Ack::OK,
            Err(e) => {
                warn!(error = %e, "Failed to update local wishlist");
                Ack::FAILED
            }
        }
    }
}
