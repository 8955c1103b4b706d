//! Read-only reference data: FAQ entries and physical stores.

use serde::{Deserialize, Serialize};

use super::id::{FaqId, StoreId};

/// A frequently asked question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FaqId>,
    pub question: String,
    pub answer: String,
}

/// A physical store location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<StoreId>,
    pub city: String,
    pub address: String,
    pub hours: String,
    pub phone: String,
}
