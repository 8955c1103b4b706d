//! User preference types.

use serde::{Deserialize, Serialize};

/// Country, language and currency preferences (`/settings`).
///
/// Unknown keys from the backend are kept in `extra` so a cached copy
/// round-trips without losing data. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleSettings {
    pub country: String,
    pub language: String,
    pub currency: String,
    pub timezone: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for LocaleSettings {
    fn default() -> Self {
        Self {
            country: "Indonesia".to_string(),
            language: "Bahasa Indonesia".to_string(),
            currency: "IDR (Rp)".to_string(),
            timezone: "GMT+7 (WIB)".to_string(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Which notification channels the user has enabled.
///
/// Every channel defaults to enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct NotificationSettings {
    pub email: bool,
    pub new_arrivals: bool,
    pub promotions: bool,
    pub order_updates: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email: true,
            new_arrivals: true,
            promotions: true,
            order_updates: true,
        }
    }
}
