//! FAQ entries and store locations.

use tracing::{instrument, warn};

use thrift_core::{Faq, FaqId, Store, StoreId};

use crate::client::ApiClient;
use crate::error::Result;
use crate::request::RequestOptions;

/// FAQ entries shown when the backend is unreachable.
#[must_use]
pub fn default_faqs() -> Vec<Faq> {
    [
        (
            "Bagaimana cara mengubah bahasa dan mata uang?",
            "Masuk ke Settings → Country & Language, pilih bahasa dan mata uang, lalu simpan.",
        ),
        (
            "Bagaimana mengatur notifikasi?",
            "Buka Settings → Notifications untuk menyalakan atau mematikan jenis notifikasi.",
        ),
        (
            "Apakah bisa refund?",
            "Kebijakan refund mengikuti ketentuan toko penjual. Silakan hubungi penjual melalui halaman pesanan.",
        ),
        (
            "Bagaimana cara menambahkan produk?",
            "Klik tombol \"Add Stuff\" di navbar, lengkapi form produk, dan submit.",
        ),
        (
            "Apakah ada biaya untuk menjual?",
            "Pendaftaran dan listing produk gratis. Biaya transaksi akan dipotong dari penjualan yang berhasil.",
        ),
    ]
    .into_iter()
    .map(|(question, answer)| Faq {
        id: None,
        question: question.to_string(),
        answer: answer.to_string(),
    })
    .collect()
}

/// Store locations shown when the backend is unreachable.
#[must_use]
pub fn default_stores() -> Vec<Store> {
    [
        ("Jakarta", "Jl. Thrift No. 12, Kemang", "021-555-1234"),
        ("Bandung", "Jl. Vintage No. 8, Dago", "022-555-5678"),
        ("Surabaya", "Jl. Retro No. 21, Darmo", "031-555-9012"),
        ("Yogyakarta", "Jl. Malioboro No. 34", "0274-555-3456"),
    ]
    .into_iter()
    .map(|(city, address, phone)| Store {
        id: None,
        city: city.to_string(),
        address: address.to_string(),
        hours: "10:00 - 21:00".to_string(),
        phone: phone.to_string(),
    })
    .collect()
}

impl ApiClient {
    /// FAQ entries, or [`default_faqs`] when the backend is unreachable.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature matches the other helpers.
    #[instrument(skip(self))]
    pub async fn faqs(&self) -> Result<Vec<Faq>> {
        let result = self
            .request_json::<Vec<Faq>>("/faq", RequestOptions::get())
            .await;
        super::or_fallback(result, "faq", || Ok(default_faqs()))
    }

    /// A single FAQ entry. There is no offline copy.
    ///
    /// # Errors
    ///
    /// Any request error.
    #[instrument(skip(self), fields(faq_id = %id))]
    pub async fn faq(&self, id: &FaqId) -> Result<Faq> {
        self.request_json(&format!("/faq/{id}"), RequestOptions::get())
            .await
    }

    /// Store locations, or [`default_stores`] when the backend is unreachable.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature matches the other helpers.
    #[instrument(skip(self))]
    pub async fn stores(&self) -> Result<Vec<Store>> {
        let result = self
            .request_json::<Vec<Store>>("/stores", RequestOptions::get())
            .await;
        super::or_fallback(result, "stores", || Ok(default_stores()))
    }

    /// A single store, or `None` when it cannot be loaded.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature matches the other helpers.
    #[instrument(skip(self), fields(store_id = %id))]
    pub async fn store_location(&self, id: &StoreId) -> Result<Option<Store>> {
        match self
            .request_json::<Option<Store>>(&format!("/stores/{id}"), RequestOptions::get())
            .await
        {
            Ok(store) => Ok(store),
            Err(e) if e.is_auth_required() => Err(e),
            Err(e) => {
                warn!(error = %e, "Store detail unavailable");
                Ok(None)
            }
        }
    }
}
