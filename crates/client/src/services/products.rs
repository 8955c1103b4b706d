//! Product listing, detail and seller management.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use thrift_core::{
    NewProduct, Product, ProductFilters, ProductId, ProductUpdate, SellerFilter, UserId,
};

use crate::client::ApiClient;
use crate::error::{ApiError, Result};
use crate::request::{Ack, RequestOptions};
use crate::storage::{KeyValueStoreExt, keys};

/// Built-in listing returned when the backend and the cache are both empty.
#[must_use]
pub fn mock_products() -> Vec<Product> {
    let now = Utc::now();
    vec![
        Product {
            id: ProductId::new(1),
            name: "Vintage Band T-Shirt".to_string(),
            description: "T-shirt band vintage kondisi sangat baik".to_string(),
            price: Decimal::from(150_000),
            category: "pakaian".to_string(),
            condition: "bekas baik".to_string(),
            seller_id: UserId::new("1"),
            images: vec!["/assets/1000021576.jpg".to_string()],
            created_at: now,
        },
        Product {
            id: ProductId::new(2),
            name: "Classic Vinyl Record".to_string(),
            description: "Piringan hitam Abbey Road original".to_string(),
            price: Decimal::from(250_000),
            category: "musik".to_string(),
            condition: "bekas baik".to_string(),
            seller_id: UserId::new("1"),
            images: vec!["/assets/abbey road (1969).jpg".to_string()],
            created_at: now,
        },
    ]
}

/// `/products` with the filters encoded as a query string.
fn products_path(filters: &ProductFilters) -> String {
    let pairs = filters.query_pairs();
    if pairs.is_empty() {
        return "/products".to_string();
    }
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    format!("/products?{query}")
}

impl ApiClient {
    /// List products.
    ///
    /// A successful fetch overwrites the global `cachedProducts` copy. On
    /// failure the cached copy is returned, or [`mock_products`] if nothing
    /// was ever cached, so the listing is never empty on first load.
    ///
    /// # Errors
    ///
    /// Only `ApiError::AuthenticationRequired`, which this endpoint does not
    /// raise in practice.
    #[instrument(skip(self))]
    pub async fn products(&self, filters: &ProductFilters) -> Result<Vec<Product>> {
        let result = self
            .request_json::<Vec<Product>>(&products_path(filters), RequestOptions::get())
            .await;

        match result {
            Ok(products) => {
                if let Err(e) = self.store().write_json(keys::CACHED_PRODUCTS, &products) {
                    warn!(error = %e, "Failed to cache product listing");
                }
                Ok(products)
            }
            Err(e) if e.is_auth_required() => Err(e),
            Err(e) => {
                warn!(error = %e, "Failed to fetch products from backend");
                match self.store().read_json::<Vec<Product>>(keys::CACHED_PRODUCTS) {
                    Ok(Some(cached)) => {
                        debug!(count = cached.len(), "Using cached products");
                        return Ok(cached);
                    }
                    Ok(None) => {}
                    Err(e) => warn!(error = %e, "Failed to read cached products"),
                }
                debug!("Using built-in mock products");
                Ok(mock_products())
            }
        }
    }

    /// Product detail, served from a short-lived in-memory cache when possible.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::ProductNotFound` on any backend failure.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Product> {
        if let Some(product) = self.product_cache().get(&id).await {
            debug!("Product cache hit");
            return Ok(product);
        }

        match self
            .request_json::<Product>(&format!("/products/{id}"), RequestOptions::get())
            .await
        {
            Ok(product) => {
                self.product_cache().insert(id, product.clone()).await;
                Ok(product)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load product");
                Err(ApiError::ProductNotFound(id))
            }
        }
    }

    /// List a new product for the current user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationRequired` without a session, or any
    /// request error.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product> {
        let created: Product = self
            .request_json(
                "/products",
                RequestOptions::post().json(product)?.requires_auth(),
            )
            .await?;
        self.product_cache().insert(created.id, created.clone()).await;
        Ok(created)
    }

    /// Update one of the current user's listings.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationRequired` without a session, or any
    /// request error.
    #[instrument(skip(self, update), fields(product_id = %id))]
    pub async fn update_product(&self, id: ProductId, update: &ProductUpdate) -> Result<Product> {
        self.product_cache().invalidate(&id).await;
        let updated: Product = self
            .request_json(
                &format!("/products/{id}"),
                RequestOptions::put().json(update)?.requires_auth(),
            )
            .await?;
        self.product_cache().insert(id, updated.clone()).await;
        Ok(updated)
    }

    /// Delete one of the current user's listings.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationRequired` without a session, or any
    /// request error.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<Ack> {
        self.product_cache().invalidate(&id).await;
        let response = self
            .request(
                &format!("/products/{id}"),
                RequestOptions::delete().requires_auth(),
            )
            .await?;
        Ok(response.ack())
    }

    /// Listings of `seller`, or of the current user when `None`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationRequired` without a session, or any
    /// request error.
    #[instrument(skip(self))]
    pub async fn user_products(&self, seller: Option<&UserId>) -> Result<Vec<Product>> {
        let filter = seller.map_or(SellerFilter::Me, |id| SellerFilter::Id(id.clone()));
        let path = products_path(&ProductFilters::by_seller(filter));
        self.request_json(&path, RequestOptions::get().requires_auth())
            .await
    }
}
