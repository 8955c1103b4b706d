//! Product listing types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{ProductId, UserId};

/// A product listed on the marketplace.
///
/// Cached globally (not per user) under `cachedProducts` after every
/// successful listing fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Price in the storefront currency (rupiah), sent as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: String,
    pub condition: String,
    pub seller_id: UserId,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /products`.
///
/// The backend assigns `id`, `seller_id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: String,
    pub condition: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Partial update sent to `PUT /products/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

/// Whose listings to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SellerFilter {
    /// The authenticated caller (`seller_id=me`).
    Me,
    /// A specific seller.
    Id(UserId),
}

/// Query filters for `GET /products`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilters {
    pub category: Option<String>,
    pub condition: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub seller: Option<SellerFilter>,
}

impl ProductFilters {
    /// Filters matching every listing of one seller.
    #[must_use]
    pub const fn by_seller(seller: SellerFilter) -> Self {
        Self {
            category: None,
            condition: None,
            min_price: None,
            max_price: None,
            seller: Some(seller),
        }
    }

    /// Query parameters in a stable order.
    ///
    /// Empty strings and zero prices are omitted.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            pairs.push(("category", category.to_string()));
        }
        if let Some(condition) = self.condition.as_deref().filter(|c| !c.is_empty()) {
            pairs.push(("condition", condition.to_string()));
        }
        if let Some(min) = self.min_price.filter(|p| !p.is_zero()) {
            pairs.push(("min_price", min.normalize().to_string()));
        }
        if let Some(max) = self.max_price.filter(|p| !p.is_zero()) {
            pairs.push(("max_price", max.normalize().to_string()));
        }
        match &self.seller {
            Some(SellerFilter::Me) => pairs.push(("seller_id", "me".to_string())),
            Some(SellerFilter::Id(id)) => pairs.push(("seller_id", id.to_string())),
            None => {}
        }

        pairs
    }
}
